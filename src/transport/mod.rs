//! # Transport Layer
//!
//! Moves framed messages between a client and a worker over TCP.
//!
//! ## Components
//! - **Connection**: one bidirectional stream wrapped in the message codec
//! - **TCP**: listener and connector setup with the service's backlog and error mapping
//!
//! The transport is symbol-agnostic; it moves raw bytes and never inspects payloads.

pub mod connection;
pub mod tcp;

pub use connection::Connection;
