//! Property-based tests using proptest
//!
//! These tests check the cipher and framing invariants across randomly generated
//! texts, keys and read boundaries.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bytes::BytesMut;
use otp_protocol::core::cipher::{self, ALPHABET};
use otp_protocol::core::codec::MessageCodec;
use otp_protocol::error::ProtocolError;
use proptest::prelude::*;
use tokio_util::codec::{Decoder, Encoder};

fn alphabet_text(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(ALPHABET.to_vec()), 0..max_len)
}

/// A text together with a key at least as long as it.
fn text_and_key() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    alphabet_text(512).prop_flat_map(|text| {
        let len = text.len();
        (
            Just(text),
            prop::collection::vec(prop::sample::select(ALPHABET.to_vec()), len..len + 64),
        )
    })
}

// Property: decrypt(encrypt(t, k), k) == t
proptest! {
    #[test]
    fn prop_cipher_roundtrip((text, key) in text_and_key()) {
        let cipher_text = cipher::encrypt(&text, &key).expect("key covers text");
        prop_assert_eq!(cipher_text.len(), text.len());

        let plain = cipher::decrypt(&cipher_text, &key).expect("key covers text");
        prop_assert_eq!(plain, text);
    }
}

// Property: ciphertext stays inside the alphabet
proptest! {
    #[test]
    fn prop_cipher_output_in_alphabet((text, key) in text_and_key()) {
        let cipher_text = cipher::encrypt(&text, &key).unwrap();
        prop_assert!(cipher::validate(&cipher_text).is_ok());
    }
}

// Property: only the first len(text) key symbols matter
proptest! {
    #[test]
    fn prop_excess_key_ignored((text, key) in text_and_key(), extra in alphabet_text(32)) {
        let mut longer = key.clone();
        longer.extend(extra);
        prop_assert_eq!(
            cipher::encrypt(&text, &key).unwrap(),
            cipher::encrypt(&text, &longer).unwrap()
        );
    }
}

// Property: any key shorter than the text is rejected
proptest! {
    #[test]
    fn prop_short_key_rejected(text in alphabet_text(256), short_by in 1usize..16) {
        prop_assume!(!text.is_empty());
        let key_len = text.len().saturating_sub(short_by);
        let key = vec![b'A'; key_len];

        let is_key_too_short = matches!(
            cipher::encrypt(&text, &key),
            Err(ProtocolError::KeyTooShort { .. })
        );
        prop_assert!(is_key_too_short);
        prop_assert!(cipher::decrypt(&text, &key).is_err());
    }
}

// Property: the engine never panics on arbitrary bytes
proptest! {
    #[test]
    fn prop_cipher_total_on_arbitrary_bytes(
        text in prop::collection::vec(any::<u8>(), 0..256),
        key in prop::collection::vec(any::<u8>(), 256..300),
    ) {
        let out = cipher::encrypt(&text, &key).unwrap();
        prop_assert_eq!(out.len(), text.len());
        let _ = cipher::decrypt(&text, &key).unwrap();
    }
}

// Property: a frame survives being fed to the decoder in arbitrary pieces
proptest! {
    #[test]
    fn prop_codec_roundtrip_across_split_reads(
        payload in prop::collection::vec(any::<u8>(), 0..4096),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let mut codec = MessageCodec::default();
        let mut encoded = BytesMut::new();
        codec.encode(payload.as_slice(), &mut encoded).unwrap();
        prop_assert_eq!(encoded.len(), 4 + payload.len());

        let mut boundaries: Vec<usize> = cuts.iter().map(|i| i.index(encoded.len() + 1)).collect();
        boundaries.push(encoded.len());
        boundaries.sort_unstable();

        let mut buf = BytesMut::new();
        let mut decoded = None;
        let mut start = 0;
        for end in boundaries {
            buf.extend_from_slice(&encoded[start..end]);
            start = end;
            if let Some(frame) = codec.decode(&mut buf).unwrap() {
                prop_assert!(decoded.is_none(), "frame decoded twice");
                decoded = Some(frame);
            }
        }

        prop_assert_eq!(decoded, Some(payload));
        prop_assert!(buf.is_empty());
    }
}

// Property: the decoder never panics on garbage input
proptest! {
    #[test]
    fn prop_decoder_total_on_garbage(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        let mut codec = MessageCodec::new(512);
        let mut buf = BytesMut::from(data.as_slice());
        let _ = codec.decode(&mut buf);
        let _ = codec.decode_eof(&mut buf);
    }
}
