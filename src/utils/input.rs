//! Text and key file loading.
//!
//! Files hold one line of alphabet symbols. The trailing newline is stripped and every
//! remaining byte must belong to the alphabet; the protocol layer receives nothing else.

use std::path::Path;

use tracing::debug;

use crate::core::cipher;
use crate::error::{ProtocolError, Result};

/// Read `path` and return its symbols.
///
/// # Errors
/// `InvalidInput` if the file cannot be read, `InvalidSymbol` if it contains a
/// byte outside the alphabet.
pub async fn read_pad_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let contents = tokio::fs::read(path).await.map_err(|e| {
        ProtocolError::InvalidInput(format!("could not open file {}: {e}", path.display()))
    })?;

    let symbols = parse_pad(contents)?;
    debug!(path = %path.display(), symbols = symbols.len(), "Loaded input file");
    Ok(symbols)
}

/// Strip one trailing line ending from `contents` and validate what is left.
pub fn parse_pad(mut contents: Vec<u8>) -> Result<Vec<u8>> {
    if contents.last() == Some(&b'\n') {
        contents.pop();
        if contents.last() == Some(&b'\r') {
            contents.pop();
        }
    }
    cipher::validate(&contents)?;
    Ok(contents)
}
