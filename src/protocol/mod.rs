//! # Protocol Layer
//!
//! Everything that happens on one service connection after `accept`.
//!
//! ## Components
//! - **Handshake**: the 7-byte role token exchanged before any framed message
//! - **Worker**: handshake, text, key, validation, transform and response for one connection
//! - **Dispatcher**: the accept loop that hands each connection to an isolated worker task

pub mod dispatcher;
pub mod handshake;
pub mod worker;
