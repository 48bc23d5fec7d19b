//! # otp-protocol
//!
//! One-time-pad encryption and decryption services over raw TCP, with matching clients.
//!
//! A client opens a connection, writes the 7-byte role token (`encrypt` or `decrypt`),
//! then two length-prefixed messages: the text and the key. The service answers with one
//! length-prefixed message holding the transformed text, or closes the connection without
//! a word if anything went wrong.
//!
//! ```text
//! client                               service
//!   | -- "encrypt" ---------------------> |
//!   | -- [len][plaintext] --------------> |
//!   | -- [len][key] --------------------> |
//!   | <------------------ [len][cipher] - |
//! ```
//!
//! ## Modules
//! - [`core`]: cipher transform and message codec
//! - [`transport`]: framed connections and TCP setup
//! - [`protocol`]: role handshake, per-connection worker, accept loop
//! - [`service`]: client requests and the command-line front ends
//! - [`utils`]: input files, key generation, logging
//! - [`config`], [`error`]: configuration and the crate-wide error type

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;
pub mod utils;

pub use config::NetworkConfig;
pub use error::{ProtocolError, Result};
pub use protocol::dispatcher::Server;
pub use protocol::handshake::Role;
