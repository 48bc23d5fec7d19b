//! Prints a random key of the requested length.
//!
//! ```bash
//! keygen 256 > mykey
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    otp_protocol::service::cli::run_keygen()
}
