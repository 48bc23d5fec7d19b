//! Length-prefixed message codec for `tokio_util::codec::Framed`.
//!
//! ```text
//! [Length(4, big-endian)] [Payload(Length)]
//! ```
//!
//! `Framed` keeps reading until a whole frame is buffered and keeps writing until the
//! encoded frame is flushed, so partial reads and writes never reach the caller.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use crate::config::{LENGTH_PREFIX_LEN, MAX_MESSAGE_SIZE};
use crate::error::{ProtocolError, Result};

/// Codec for one length-prefixed message.
///
/// Declared lengths above `max_length` are rejected before anything is allocated for them.
#[derive(Debug, Clone, Copy)]
pub struct MessageCodec {
    max_length: usize,
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new(MAX_MESSAGE_SIZE)
    }
}

impl MessageCodec {
    /// Codec accepting payloads of at most `max_length` bytes (capped at `u32::MAX`)
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length: max_length.min(u32::MAX as usize),
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    fn check_length(&self, length: usize) -> Result<()> {
        if length > self.max_length {
            return Err(ProtocolError::OversizedMessage {
                length,
                limit: self.max_length,
            });
        }
        Ok(())
    }
}

/// Read the declared payload length at the front of `src`, if the prefix is complete.
#[inline]
fn peek_length(src: &[u8]) -> Option<usize> {
    let prefix: [u8; LENGTH_PREFIX_LEN] = src.get(..LENGTH_PREFIX_LEN)?.try_into().ok()?;
    Some(u32::from_be_bytes(prefix) as usize)
}

impl Decoder for MessageCodec {
    type Item = Vec<u8>;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        let Some(length) = peek_length(src) else {
            src.reserve(LENGTH_PREFIX_LEN - src.len());
            return Ok(None);
        };

        self.check_length(length)?;

        // The buffer grows only as payload bytes arrive, never to the declared length up front.
        if src.len() < LENGTH_PREFIX_LEN + length {
            return Ok(None);
        }

        src.advance(LENGTH_PREFIX_LEN);
        let payload = src.split_to(length).to_vec();

        trace!(bytes = length, "Decoded message");
        Ok(Some(payload))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if src.is_empty() {
            return Ok(None);
        }

        // Peer closed with part of a frame buffered.
        Err(match peek_length(src) {
            Some(length) => ProtocolError::TruncatedMessage {
                expected: length,
                received: src.len() - LENGTH_PREFIX_LEN,
            },
            None => ProtocolError::TruncatedMessage {
                expected: LENGTH_PREFIX_LEN,
                received: src.len(),
            },
        })
    }
}

impl<'a> Encoder<&'a [u8]> for MessageCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: &'a [u8], dst: &mut BytesMut) -> Result<()> {
        self.check_length(item.len())?;

        dst.reserve(LENGTH_PREFIX_LEN + item.len());
        // check_length bounds the length to u32::MAX
        dst.put_u32(item.len() as u32);
        dst.extend_from_slice(item);
        Ok(())
    }
}
