#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use otp_protocol::core::codec::MessageCodec;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Fuzz frame decoding - test for panics and allocations beyond the ceiling
    let mut codec = MessageCodec::new(64 * 1024);
    let mut buf = BytesMut::from(data);
    while let Ok(Some(frame)) = codec.decode(&mut buf) {
        assert!(frame.len() <= 64 * 1024);
    }
    let _ = codec.decode_eof(&mut buf);
});
