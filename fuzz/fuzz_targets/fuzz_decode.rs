#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header parsing and decode must never panic
    let _ = zenuimg::ImageInfo::from_bytes(data);
    if let Ok(decoded) = zenuimg::decode(data) {
        let _ = decoded.to_rgba8();
    }

    // Every palette precision hint must be handled
    for bits in [9, 12, 18, 24, 0] {
        let _ = zenuimg::DecodeRequest::new(data).with_palette_bits(bits).decode();
    }
});
