//! Random key generation over the cipher alphabet.

use rand::Rng;

use crate::core::cipher::ALPHABET;
use crate::error::{ProtocolError, Result};

/// Longest key `generate_key` will produce
pub const MAX_KEY_LENGTH: usize = 100_000;

/// Draw `length` symbols uniformly from the alphabet.
///
/// # Errors
/// `InvalidInput` unless `1 <= length <= MAX_KEY_LENGTH`.
pub fn generate_key<R>(length: usize, rng: &mut R) -> Result<Vec<u8>>
where
    R: Rng,
{
    if length == 0 {
        return Err(ProtocolError::InvalidInput(
            "Key length must be a positive integer".to_string(),
        ));
    }
    if length > MAX_KEY_LENGTH {
        return Err(ProtocolError::InvalidInput(format!(
            "Key length too large (maximum {MAX_KEY_LENGTH})"
        )));
    }

    let mut key = Vec::new();
    key.try_reserve_exact(length)
        .map_err(|_| ProtocolError::AllocationFailure(length))?;
    key.extend((0..length).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())]));
    Ok(key)
}
