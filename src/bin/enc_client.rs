//! Encryption client.
//!
//! ```bash
//! enc_client plaintext1 mykey 57171 > ciphertext1
//! ```

use std::process::ExitCode;

use otp_protocol::protocol::handshake::Role;
use otp_protocol::service::cli;

#[tokio::main]
async fn main() -> ExitCode {
    cli::run_client(Role::Encrypt).await
}
