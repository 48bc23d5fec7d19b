use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, instrument};

use crate::core::codec::MessageCodec;
use crate::error::{ProtocolError, Result};

/// A single exchange's connection, owned by exactly one worker or client.
///
/// The stream is closed when the `Connection` is dropped, whichever path drops it.
pub struct Connection<S> {
    framed: Framed<S, MessageCodec>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a stream whose handshake bytes have already been consumed or written.
    pub fn new(stream: S, codec: MessageCodec) -> Self {
        Self {
            framed: Framed::new(stream, codec),
        }
    }

    /// Send one length-prefixed message and flush it.
    #[instrument(skip(self, payload), fields(bytes = payload.len()), level = "debug")]
    pub async fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.framed.send(payload).await?;
        debug!("Message sent");
        Ok(())
    }

    /// Receive one whole message.
    ///
    /// # Errors
    /// `ConnectionClosed` if the peer closed before a new message started,
    /// `TruncatedMessage` if it closed in the middle of one, `OversizedMessage`
    /// if the declared length exceeds the codec's ceiling.
    #[instrument(skip(self), level = "debug")]
    pub async fn receive(&mut self) -> Result<Vec<u8>> {
        let payload = self
            .framed
            .next()
            .await
            .ok_or(ProtocolError::ConnectionClosed)??;
        debug!(bytes = payload.len(), "Message received");
        Ok(payload)
    }
}
