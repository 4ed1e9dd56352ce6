#![no_main]
use libfuzzer_sys::fuzz_target;
use zenuimg::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical output
    let Ok(decoded) = decode(data) else {
        return;
    };

    let header = decoded.header;
    let Ok(pixel_format) = header.pixel_format() else {
        return;
    };
    // The palette was decoded at full precision, so re-encode at full precision
    let palette = match header.palette {
        None => PaletteFormat::None,
        Some(PaletteVariant::Ste) => PaletteFormat::Ste { bits: 12 },
        Some(PaletteVariant::Tt) => PaletteFormat::Tt { bits: 12 },
        Some(PaletteVariant::Falcon) => PaletteFormat::Falcon { bits: 24 },
    };
    let config = Config::new(pixel_format, palette).expect("decoded header is a valid config");

    let reencoded = encode(
        config,
        decoded.palette(),
        decoded.pixels(),
        decoded.width,
        decoded.height,
        decoded.layout,
    )
    .expect("decoded image must re-encode");
    let Ok(decoded2) = decode(&reencoded) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    assert_eq!(decoded.palette(), decoded2.palette(), "roundtrip palette mismatch");
    let expected_header = ContainerHeader {
        version: container::VERSION,
        ..decoded.header
    };
    assert_eq!(expected_header, decoded2.header);
});
