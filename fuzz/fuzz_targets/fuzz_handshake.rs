#![no_main]

use libfuzzer_sys::fuzz_target;
use otp_protocol::protocol::handshake::{negotiate_role, Role};

fuzz_target!(|data: &[u8]| {
    // Fuzz the role token reader with arbitrary client bytes
    let Ok(rt) = tokio::runtime::Builder::new_current_thread().build() else {
        return;
    };
    rt.block_on(async {
        let mut input = data;
        let accepted = negotiate_role(&mut input, Role::Encrypt).await.is_ok();
        assert_eq!(accepted, data.starts_with(b"encrypt"));
    });
});
