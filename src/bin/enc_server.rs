//! Encryption service.
//!
//! ```bash
//! enc_server 57171 &
//! ```

use std::process::ExitCode;

use otp_protocol::protocol::handshake::Role;
use otp_protocol::service::cli;

#[tokio::main]
async fn main() -> ExitCode {
    cli::run_server(Role::Encrypt).await
}
