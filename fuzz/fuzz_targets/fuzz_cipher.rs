#![no_main]

use libfuzzer_sys::fuzz_target;
use otp_protocol::core::cipher;

fuzz_target!(|data: &[u8]| {
    // Split the input into text and key; the transform must never panic
    let (text, key) = data.split_at(data.len() / 2);
    if let Ok(encrypted) = cipher::encrypt(text, key) {
        assert_eq!(encrypted.len(), text.len());
        if cipher::validate(text).is_ok() && cipher::validate(&key[..text.len()]).is_ok() {
            assert_eq!(cipher::decrypt(&encrypted, key).ok().as_deref(), Some(text));
        }
    }
});
