//! Connection worker: one request/response exchange per connection.
//!
//! ```text
//! AwaitingHandshake -> AwaitingText -> AwaitingKey -> Validating -> Transforming -> Sending -> Done
//! ```
//!
//! Any step may fail instead, which ends the exchange with the connection closed and
//! nothing written back. Buffers and the stream are owned by the worker future, so
//! every exit path releases them.

use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, instrument, warn};

use crate::config::ServerConfig;
use crate::core::cipher;
use crate::core::codec::MessageCodec;
use crate::error::{constants, ProtocolError};
use crate::protocol::handshake::{negotiate_role, Role};
use crate::transport::Connection;

/// Per-service settings shared by every worker of that service.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub role: Role,
    pub max_message_size: usize,
    pub validate_alphabet: bool,
}

impl WorkerSettings {
    pub fn new(role: Role, config: &ServerConfig) -> Self {
        Self {
            role,
            max_message_size: config.max_message_size,
            validate_alphabet: config.validate_alphabet,
        }
    }
}

/// Step of the exchange a worker is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    AwaitingHandshake,
    AwaitingText,
    AwaitingKey,
    Validating,
    Transforming,
    Sending,
    Done,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::AwaitingHandshake => "awaiting handshake",
            WorkerState::AwaitingText => "awaiting text",
            WorkerState::AwaitingKey => "awaiting key",
            WorkerState::Validating => "validating",
            WorkerState::Transforming => "transforming",
            WorkerState::Sending => "sending",
            WorkerState::Done => "done",
        };
        f.write_str(name)
    }
}

/// An exchange that ended in the failed state.
#[derive(Error, Debug)]
#[error("exchange failed while {state}: {source}")]
pub struct WorkerError {
    pub state: WorkerState,
    #[source]
    pub source: ProtocolError,
}

fn failed_in(state: WorkerState) -> impl FnOnce(ProtocolError) -> WorkerError {
    move |source| WorkerError { state, source }
}

/// Drive one exchange on `stream` to completion.
///
/// Returns the length of the result that was sent back.
pub async fn run_worker<S>(
    mut stream: S,
    settings: &WorkerSettings,
) -> std::result::Result<usize, WorkerError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    negotiate_role(&mut stream, settings.role)
        .await
        .map_err(failed_in(WorkerState::AwaitingHandshake))?;

    let mut conn = Connection::new(stream, MessageCodec::new(settings.max_message_size));

    let payload = conn
        .receive()
        .await
        .map_err(failed_in(WorkerState::AwaitingText))?;

    let key = conn
        .receive()
        .await
        .map_err(failed_in(WorkerState::AwaitingKey))?;

    validate_exchange(&payload, &key, settings.validate_alphabet)
        .map_err(failed_in(WorkerState::Validating))?;

    let result = settings
        .role
        .transform(&payload, &key)
        .map_err(failed_in(WorkerState::Transforming))?;

    conn.send(&result)
        .await
        .map_err(failed_in(WorkerState::Sending))?;

    debug!(state = %WorkerState::Done, bytes = result.len(), "Exchange complete");
    Ok(result.len())
}

fn validate_exchange(
    payload: &[u8],
    key: &[u8],
    check_alphabet: bool,
) -> crate::error::Result<()> {
    cipher::check_key_length(payload, key)?;
    if check_alphabet {
        cipher::validate(payload)?;
        cipher::validate(&key[..payload.len()])?;
    }
    Ok(())
}

/// Run a worker for an accepted connection and report how it ended.
///
/// Failures are logged here and never propagate to the dispatcher.
#[instrument(skip(stream, settings), fields(role = %settings.role))]
pub async fn handle_connection<S>(stream: S, peer: SocketAddr, settings: WorkerSettings)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match run_worker(stream, &settings).await {
        Ok(bytes) => info!(%peer, bytes, "Exchange complete"),
        Err(WorkerError { state, source }) => match &source {
            ProtocolError::HandshakeRejected { received, .. } => {
                warn!(%peer, %state, received = %received, "{}", constants::ERR_HANDSHAKE_REJECTED)
            }
            ProtocolError::KeyTooShort { key_len, text_len } => {
                warn!(%peer, %state, key_len, text_len, "{}", constants::ERR_KEY_TOO_SHORT)
            }
            ProtocolError::InvalidSymbol { byte, position } => {
                warn!(%peer, %state, byte, position, "{}", constants::ERR_INVALID_SYMBOL)
            }
            ProtocolError::OversizedMessage { length, limit } => {
                warn!(%peer, %state, length, limit, "{}", constants::ERR_OVERSIZED_MESSAGE)
            }
            e if e.is_disconnect() => {
                info!(%peer, %state, error = %e, "{}", constants::ERR_CONNECTION_CLOSED)
            }
            e => error!(%peer, %state, error = %e, "Exchange failed"),
        },
    }
}
