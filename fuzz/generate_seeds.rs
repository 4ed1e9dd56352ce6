#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(flags: u16, bpp: u8, bpc: i8, dims: Option<(u16, u16)>) -> Vec<u8> {
    let mut out = b"UIMG\0".to_vec();
    out.extend_from_slice(&0x0100u16.to_be_bytes());
    out.extend_from_slice(&flags.to_be_bytes());
    out.push(bpp);
    out.push(bpc as u8);
    if let Some((w, h)) = dims {
        out.extend_from_slice(&w.to_be_bytes());
        out.extend_from_slice(&h.to_be_bytes());
    }
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 16x1 4bpp planar, STE palette
    let mut ste = header(0b01, 4, 0, Some((16, 1)));
    for i in 0..16u16 {
        ste.extend_from_slice(&(i * 0x111).to_be_bytes());
    }
    ste.extend_from_slice(&[0xAA, 0x55, 0x0F, 0xF0, 0x00, 0xFF, 0x12, 0x34]);
    fs::write(format!("{dir}/ste_planar_16x1.uimg"), ste).unwrap();

    // 16x2 2bpp packed, TT palette
    let mut tt = header(0b10, 2, -1, Some((16, 2)));
    tt.extend_from_slice(&[0x00, 0x00, 0x0F, 0x00, 0x00, 0xF0, 0x00, 0x0F]);
    tt.extend_from_slice(&[0x1B; 8]);
    fs::write(format!("{dir}/tt_packed_16x2.uimg"), tt).unwrap();

    // 2x2 8bpp in 1-byte chunks, Falcon palette
    let mut falcon = header(0b11, 8, 1, Some((2, 2)));
    for i in 0..=255u8 {
        falcon.extend_from_slice(&[i, 255 - i, 0, i / 2]);
    }
    falcon.extend_from_slice(&[0, 1, 254, 255]);
    fs::write(format!("{dir}/falcon_fixed8_2x2.uimg"), falcon).unwrap();

    // 2x1 RGB565 and 1x1 ARGB
    let mut rgb565 = header(0, 16, 2, Some((2, 1)));
    rgb565.extend_from_slice(&[0xF8, 0x00, 0x07, 0xE0]);
    fs::write(format!("{dir}/rgb565_2x1.uimg"), rgb565).unwrap();
    let mut argb = header(0, 32, 4, Some((1, 1)));
    argb.extend_from_slice(&[0x80, 0xFF, 0x00, 0x00]);
    fs::write(format!("{dir}/argb_1x1.uimg"), argb).unwrap();

    // Palette-only and header-only
    let mut palette_only = header(0b11, 0, 0, None);
    palette_only.extend_from_slice(&[0xFF, 0x00, 0x00, 0x80]);
    fs::write(format!("{dir}/palette_only.uimg"), palette_only).unwrap();
    fs::write(format!("{dir}/header_only.uimg"), header(0, 0, 0, None)).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_magic.bin"), b"UIMG\0").unwrap();
    fs::write(format!("{dir}/no_dims.bin"), header(0, 4, 0, None)).unwrap();
    fs::write(format!("{dir}/bad_chunk.bin"), header(0, 8, 9, Some((1, 1)))).unwrap();

    println!("Generated seed corpus in {dir}/");
}
