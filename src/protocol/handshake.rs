//! Role handshake.
//!
//! Before any framed message, the client writes the 7 ASCII bytes of the operation it
//! expects (`encrypt` or `decrypt`). The token carries no length prefix. A service only
//! accepts its own role; on a mismatch it closes without writing anything back.

use std::fmt;
use std::str::FromStr;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument};

use crate::config::ROLE_TOKEN_LEN;
use crate::core::cipher;
use crate::error::{ProtocolError, Result};

/// Operation a service performs and a client requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Encrypt,
    Decrypt,
}

impl Role {
    /// Literal token sent on the wire
    pub const fn token(self) -> &'static [u8; ROLE_TOKEN_LEN] {
        match self {
            Role::Encrypt => b"encrypt",
            Role::Decrypt => b"decrypt",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Encrypt => "encrypt",
            Role::Decrypt => "decrypt",
        }
    }

    /// Role whose token is exactly `token`
    pub fn from_token(token: &[u8]) -> Option<Self> {
        [Role::Encrypt, Role::Decrypt]
            .into_iter()
            .find(|role| role.token().as_slice() == token)
    }

    /// Apply this role's cipher direction to `payload`.
    pub fn transform(self, payload: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        match self {
            Role::Encrypt => cipher::encrypt(payload, key),
            Role::Decrypt => cipher::decrypt(payload, key),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Role::from_token(s.as_bytes())
            .ok_or_else(|| ProtocolError::InvalidInput(format!("Unknown role: '{s}'")))
    }
}

/// Server side: read the client's role token and check it against `expected`.
///
/// Reads loop until all 7 bytes have arrived.
///
/// # Errors
/// - `ConnectionClosed` if the peer closed before sending anything
/// - `TruncatedMessage` if it closed part way through the token
/// - `HandshakeRejected` if the token is not `expected`'s
#[instrument(skip(stream), fields(expected = %expected))]
pub async fn negotiate_role<S>(stream: &mut S, expected: Role) -> Result<()>
where
    S: AsyncRead + Unpin,
{
    let mut token = [0u8; ROLE_TOKEN_LEN];
    let mut filled = 0;

    while filled < ROLE_TOKEN_LEN {
        let n = stream.read(&mut token[filled..]).await?;
        if n == 0 {
            return Err(if filled == 0 {
                ProtocolError::ConnectionClosed
            } else {
                ProtocolError::TruncatedMessage {
                    expected: ROLE_TOKEN_LEN,
                    received: filled,
                }
            });
        }
        filled += n;
    }

    if &token != expected.token() {
        return Err(ProtocolError::HandshakeRejected {
            expected: expected.to_string(),
            received: String::from_utf8_lossy(&token).into_owned(),
        });
    }

    debug!("Role accepted");
    Ok(())
}

/// Client side: write `role`'s token.
#[instrument(skip(stream), fields(role = %role))]
pub async fn announce_role<S>(stream: &mut S, role: Role) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(role.token()).await?;
    Ok(())
}
