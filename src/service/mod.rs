//! # Services
//!
//! Entry points that tie the protocol pieces together for the binaries.
//!
//! - **Client**: one request against an encryption or decryption service
//! - **CLI**: argument parsing, input loading and exit-code handling shared by the binaries

pub mod cli;
pub mod client;
