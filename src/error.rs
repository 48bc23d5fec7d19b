//! # Error Types
//!
//! Error handling for the one-time-pad protocol services and clients.
//!
//! Every failure is reported locally by the side that detects it. Nothing here is
//! ever written to the wire: a worker that hits any of these errors simply closes
//! its connection, and the missing response is the peer's only signal.
//!
//! ## Error Categories
//! - **Connection Errors**: bind, accept and connect failures (fatal to the process)
//! - **I/O Errors**: send/receive failures and mid-message disconnects (fatal to one worker)
//! - **Protocol Errors**: role token mismatch during the handshake
//! - **Validation Errors**: key shorter than the payload, bytes outside the alphabet
//! - **Allocation Errors**: payload buffers that could not be reserved
//!
//! ## Example Usage
//! ```rust
//! use otp_protocol::core::cipher;
//! use otp_protocol::error::ProtocolError;
//!
//! match cipher::encrypt(b"HELLO", b"KEY") {
//!     Err(ProtocolError::KeyTooShort { key_len, text_len }) => {
//!         assert_eq!((key_len, text_len), (3, 5));
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Connection errors
    pub const ERR_CONNECTION_CLOSED: &str = "Connection closed by peer";

    /// Handshake errors
    pub const ERR_HANDSHAKE_REJECTED: &str = "Client rejected: unexpected role token";

    /// Validation errors
    pub const ERR_KEY_TOO_SHORT: &str = "Key is shorter than the payload";
    pub const ERR_INVALID_SYMBOL: &str = "Input contains bad characters";

    /// Framing errors
    pub const ERR_OVERSIZED_MESSAGE: &str = "Declared message length exceeds the configured ceiling";
}

/// ProtocolError is the primary error type for every operation in the crate
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    #[error("Failed to connect to {address}: {source}")]
    ConnectFailed {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Connection closed after {received} of {expected} bytes")]
    TruncatedMessage { expected: usize, received: usize },

    #[error("Handshake rejected: expected role {expected:?}, received {received:?}")]
    HandshakeRejected { expected: String, received: String },

    #[error("Key too short: {key_len} key symbols for {text_len} payload symbols")]
    KeyTooShort { key_len: usize, text_len: usize },

    #[error("Invalid symbol 0x{byte:02x} at position {position}")]
    InvalidSymbol { byte: u8, position: usize },

    #[error("Message too large: {length} bytes (limit {limit})")]
    OversizedMessage { length: usize, limit: usize },

    #[error("Failed to allocate {0} bytes")]
    AllocationFailure(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ProtocolError {
    /// Process exit code for a client or server that terminates with this error.
    ///
    /// Connection failures exit with `2`; every other failure exits with `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProtocolError::ConnectFailed { .. } => 2,
            _ => 1,
        }
    }

    /// Whether the peer went away rather than the local side failing.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            ProtocolError::ConnectionClosed | ProtocolError::TruncatedMessage { .. }
        ) || matches!(
            self,
            ProtocolError::Io(e) if matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::BrokenPipe
            )
        )
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
