use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::core::cipher;
use crate::core::codec::MessageCodec;
use crate::error::Result;
use crate::protocol::handshake::{announce_role, Role};
use crate::transport::{tcp, Connection};

/// Send `payload` and `key` to the `role` service at `address` and return its result.
///
/// The key length is checked before connecting, so a key that is too short never
/// reaches the network.
///
/// # Errors
/// - `KeyTooShort` if `key` cannot cover `payload`
/// - `ConnectFailed` if the service cannot be reached
/// - `ConnectionClosed` / `TruncatedMessage` if the service closed without a full
///   response, which is how a rejected role or a server-side validation failure shows up
#[instrument(skip(payload, key), fields(payload_len = payload.len(), key_len = key.len()))]
pub async fn request(
    address: &str,
    role: Role,
    payload: &[u8],
    key: &[u8],
    max_message_size: usize,
) -> Result<Vec<u8>> {
    cipher::check_key_length(payload, key)?;

    let mut stream = tcp::connect(address).await?;
    announce_role(&mut stream, role).await?;

    let mut conn = Connection::new(stream, MessageCodec::new(max_message_size));
    conn.send(payload).await?;
    conn.send(key).await?;

    let result = conn.receive().await?;
    debug!(bytes = result.len(), "Response received");
    Ok(result)
}

/// [`request`] against `config.host` on `port`.
pub async fn request_with_config(
    config: &ClientConfig,
    port: u16,
    role: Role,
    payload: &[u8],
    key: &[u8],
) -> Result<Vec<u8>> {
    request(
        &config.address(port),
        role,
        payload,
        key,
        config.max_message_size,
    )
    .await
}
