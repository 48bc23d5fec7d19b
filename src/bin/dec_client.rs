//! Decryption client.
//!
//! ```bash
//! dec_client ciphertext1 mykey 57172 > plaintext1_a
//! ```

use std::process::ExitCode;

use otp_protocol::protocol::handshake::Role;
use otp_protocol::service::cli;

#[tokio::main]
async fn main() -> ExitCode {
    cli::run_client(Role::Decrypt).await
}
