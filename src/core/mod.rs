//! # Core Protocol Components
//!
//! The cipher transform and the message framing it travels in.
//!
//! ## Components
//! - **Cipher**: modular one-time-pad over the 27-symbol alphabet
//! - **Codec**: Tokio codec for length-prefixed framing over byte streams
//!
//! ## Wire Format
//! ```text
//! [Role(7)]                      client -> server, raw ASCII, no prefix
//! [Length(4)] [Payload(N)]       text, then key, then the server's result
//! ```
//!
//! ## Security
//! - Maximum message size: 16MB by default (prevents memory exhaustion)
//! - Length validation before allocation

pub mod cipher;
pub mod codec;
