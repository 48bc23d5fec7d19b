//! # Utility Modules
//!
//! Supporting pieces used by the binaries around the protocol core.
//!
//! ## Components
//! - **Input**: loading text and key files, trusted-upstream alphabet validation
//! - **Keygen**: random key material over the cipher alphabet
//! - **Logging**: `tracing` subscriber setup writing diagnostics to stderr

pub mod input;
pub mod keygen;
pub mod logging;
