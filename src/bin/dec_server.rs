//! Decryption service.
//!
//! ```bash
//! dec_server 57172 &
//! ```

use std::process::ExitCode;

use otp_protocol::protocol::handshake::Role;
use otp_protocol::service::cli;

#[tokio::main]
async fn main() -> ExitCode {
    cli::run_server(Role::Decrypt).await
}
