//! One-time-pad transform over the 27-symbol alphabet.
//!
//! Each payload symbol is combined with the key symbol at the same position:
//!
//! ```text
//! cipher[i] = symbol((index(text[i]) + index(key[i])) mod 27)
//! text[i]   = symbol((index(cipher[i]) - index(key[i]) + 27) mod 27)
//! ```
//!
//! The transform does not check alphabet membership. A byte outside `A..=Z` and space
//! is indexed as `byte - 'A'` (wrapping) and reduced mod 27, which yields a wrong but
//! in-range symbol. Callers that cannot trust their input run [`validate`] first.

use crate::error::{ProtocolError, Result};

/// Ordered symbol set: `A` is index 0, `Z` is 25, space is 26.
pub const ALPHABET: [u8; 27] = *b"ABCDEFGHIJKLMNOPQRSTUVWXYZ ";

/// Number of symbols in [`ALPHABET`]
pub const ALPHABET_LEN: u8 = ALPHABET.len() as u8;

const SPACE: u8 = b' ';
const SPACE_INDEX: u8 = 26;

/// Alphabet index of `symbol`.
#[inline]
pub fn index(symbol: u8) -> u8 {
    if symbol == SPACE {
        SPACE_INDEX
    } else {
        symbol.wrapping_sub(b'A')
    }
}

/// Symbol at alphabet position `index mod 27`.
#[inline]
pub fn symbol(index: u8) -> u8 {
    ALPHABET[usize::from(index % ALPHABET_LEN)]
}

/// Whether `byte` belongs to the alphabet.
#[inline]
pub fn is_valid_symbol(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte == SPACE
}

/// Check every byte of `data` against the alphabet.
///
/// # Errors
/// Returns `ProtocolError::InvalidSymbol` naming the first offending byte.
pub fn validate(data: &[u8]) -> Result<()> {
    match data.iter().position(|&b| !is_valid_symbol(b)) {
        Some(position) => Err(ProtocolError::InvalidSymbol {
            byte: data[position],
            position,
        }),
        None => Ok(()),
    }
}

/// Encrypt `text` with `key`. Key symbols past `text.len()` are ignored.
///
/// # Errors
/// `KeyTooShort` if `key.len() < text.len()`, `AllocationFailure` if the output
/// buffer cannot be reserved.
pub fn encrypt(text: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    apply(text, key, |t, k| (u16::from(t) + u16::from(k)) % 27)
}

/// Decrypt `cipher` with `key`. Key symbols past `cipher.len()` are ignored.
///
/// # Errors
/// Same as [`encrypt`].
pub fn decrypt(cipher: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    apply(cipher, key, |c, k| (u16::from(c) + 27 - u16::from(k)) % 27)
}

fn apply<F>(payload: &[u8], key: &[u8], combine: F) -> Result<Vec<u8>>
where
    F: Fn(u8, u8) -> u16,
{
    check_key_length(payload, key)?;

    let mut out = Vec::new();
    out.try_reserve_exact(payload.len())
        .map_err(|_| ProtocolError::AllocationFailure(payload.len()))?;

    out.extend(payload.iter().zip(key).map(|(&p, &k)| {
        let combined = combine(index(p) % ALPHABET_LEN, index(k) % ALPHABET_LEN);
        // combined < 27 by construction
        symbol(combined as u8)
    }));
    Ok(out)
}

/// `len(key) >= len(payload)`, the precondition of both transforms.
///
/// # Errors
/// `KeyTooShort` when the key cannot cover the payload.
pub fn check_key_length(payload: &[u8], key: &[u8]) -> Result<()> {
    if key.len() < payload.len() {
        return Err(ProtocolError::KeyTooShort {
            key_len: key.len(),
            text_len: payload.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_symbol_are_inverse_over_the_alphabet() {
        for (i, &s) in ALPHABET.iter().enumerate() {
            assert_eq!(usize::from(index(s)), i);
            assert_eq!(symbol(index(s)), s);
        }
    }

    #[test]
    fn space_is_the_last_symbol() {
        assert_eq!(index(b' '), 26);
        assert_eq!(symbol(26), b' ');
        assert_eq!(symbol(0), b'A');
    }

    #[test]
    fn encrypt_known_vector() {
        // H(7)+X(23)=30%27=3 -> D, E(4)+M(12)=16 -> Q, L(11)+R(17)=28%27=1 -> B
        let cipher = encrypt(b"HEL", b"XMR").unwrap();
        assert_eq!(cipher, b"DQB");
        assert_eq!(decrypt(&cipher, b"XMR").unwrap(), b"HEL");
    }

    #[test]
    fn space_wraps_around() {
        // space(26) + B(1) = 27 % 27 = 0 -> A
        assert_eq!(encrypt(b" ", b"B").unwrap(), b"A");
        assert_eq!(decrypt(b"A", b"B").unwrap(), b" ");
    }

    #[test]
    fn longer_key_is_truncated() {
        let cipher = encrypt(b"AB", b"CDEFG").unwrap();
        assert_eq!(cipher.len(), 2);
        assert_eq!(cipher, b"CE");
    }

    #[test]
    fn equal_length_key_is_accepted() {
        assert!(encrypt(b"HELLO", b"WORLD").is_ok());
    }

    #[test]
    fn key_one_short_is_rejected() {
        let err = encrypt(b"HELLO", b"WORL").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::KeyTooShort {
                key_len: 4,
                text_len: 5
            }
        ));
        assert!(decrypt(b"HELLO", b"WORL").is_err());
    }

    #[test]
    fn empty_payload_produces_empty_output() {
        assert!(encrypt(b"", b"").unwrap().is_empty());
        assert!(decrypt(b"", b"ABC").unwrap().is_empty());
    }

    #[test]
    fn out_of_alphabet_bytes_do_not_panic() {
        let cipher = encrypt(b"a\n~", b"\0ZZ").unwrap();
        assert_eq!(cipher.len(), 3);
        assert!(cipher.iter().all(|&b| is_valid_symbol(b)));
    }

    #[test]
    fn validate_reports_first_bad_byte() {
        assert!(validate(b"HELLO WORLD").is_ok());
        assert!(validate(b"").is_ok());
        match validate(b"HELLO, WORLD") {
            Err(ProtocolError::InvalidSymbol { byte, position }) => {
                assert_eq!(byte, b',');
                assert_eq!(position, 5);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
