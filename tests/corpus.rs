//! Test corpus: roundtrip tests with various patterns, sizes, and formats.

use zenuimg::pixels::fixed::{pack_rgb565, unpack_rgb565};
use zenuimg::*;

fn checkerboard(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * bpp];
    for y in 0..h {
        for x in 0..w {
            let off = (y * w + x) * bpp;
            if (x + y) % 2 == 0 {
                for c in 0..bpp {
                    pixels[off + c] = 200 + (c as u8 * 20);
                }
            } else {
                for c in 0..bpp {
                    pixels[off + c] = 10 + (c as u8 * 30);
                }
            }
        }
    }
    pixels
}

fn noise_pattern(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * bpp];
    let mut state: u32 = 0xDEAD_BEEF;
    for p in pixels.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *p = state as u8;
    }
    pixels
}

fn noise_indices(w: usize, h: usize, bits_per_pixel: u8) -> Vec<u8> {
    let mask = ((1u16 << bits_per_pixel) - 1) as u8;
    noise_pattern(w, h, 1).into_iter().map(|v| v & mask).collect()
}

fn noise_palette(entries: usize) -> ColorTable {
    ColorTable::from_rgb_bytes(&noise_pattern(entries, 1, 3))
}

fn indexed_formats() -> Vec<PixelFormat> {
    let mut formats = Vec::new();
    for bpp in [1, 2, 4, 6, 8] {
        formats.push(PixelFormat::planar(bpp).unwrap());
        for bpc in 1..=4 {
            formats.push(PixelFormat::fixed(bpc, bpp).unwrap());
        }
    }
    for bpp in [1, 2, 4] {
        formats.push(PixelFormat::packed(bpp).unwrap());
    }
    formats
}

fn palette_formats(bits_per_pixel: u8) -> Vec<PaletteFormat> {
    let mut palettes = vec![PaletteFormat::None];
    for bits in [9, 12] {
        if bits_per_pixel <= 4 {
            palettes.push(PaletteFormat::ste(bits).unwrap());
        }
        palettes.push(PaletteFormat::tt(bits).unwrap());
    }
    for bits in [9, 12, 18, 24] {
        palettes.push(PaletteFormat::falcon(bits).unwrap());
    }
    palettes
}

/// What a color table looks like after a trip through the registers.
fn quantized(table: &ColorTable, palette: PaletteFormat, slots: usize) -> ColorTable {
    let variant = palette.variant().unwrap();
    let bits = palette.bits();
    ColorTable::new(
        (0..slots)
            .map(|i| {
                let rgb = table.get(i).unwrap_or([0, 0, 0]);
                let word = variant.encode_color(rgb, bits).unwrap();
                variant.decode_color(word, bits).unwrap()
            })
            .collect(),
    )
}

// ── Indexed roundtrips ───────────────────────────────────────────────

#[test]
fn every_indexed_combination_roundtrips() {
    let (w, h) = (32, 5);
    for format in indexed_formats() {
        let bpp = format.bits_per_pixel();
        let indices = noise_indices(w, h, bpp);
        let table = noise_palette(1 << bpp);
        for palette in palette_formats(bpp) {
            let config = Config::new(Some(format), palette).unwrap();
            let encoded = EncodeRequest::new(config)
                .with_palette(&table)
                .encode(&indices, w as u32, h as u32, PixelLayout::Indexed8)
                .unwrap();

            let info = ImageInfo::from_bytes(&encoded).unwrap();
            assert_eq!(info.total_len(), encoded.len(), "{format:?} {palette:?}");

            let mut request = DecodeRequest::new(&encoded);
            if !palette.is_none() {
                request = request.with_palette_bits(palette.bits());
            }
            let decoded = request.decode().unwrap();
            assert_eq!(decoded.pixels(), &indices[..], "{format:?} {palette:?}");
            assert_eq!(decoded.layout, PixelLayout::Indexed8);

            match palette.variant() {
                Some(_) => assert_eq!(
                    decoded.palette().unwrap(),
                    &quantized(&table, palette, 1 << bpp),
                    "{format:?} {palette:?}"
                ),
                None => assert!(decoded.palette().is_none()),
            }
        }
    }
}

#[test]
fn single_byte_chunks_are_borrowed() {
    for bpp in [1, 2, 4, 6, 8] {
        let indices = noise_indices(19, 7, bpp);
        let format = PixelFormat::fixed(1, bpp).unwrap();
        let config = Config::new(Some(format), PaletteFormat::None).unwrap();
        let encoded = encode(config, None, &indices, 19, 7, PixelLayout::Indexed8).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert!(decoded.is_borrowed(), "bpp {bpp}");
        assert_eq!(decoded.pixels(), &indices[..]);
    }
}

#[test]
fn wide_chunks_are_owned() {
    let indices = noise_indices(8, 8, 8);
    let config = Config::new(Some(PixelFormat::fixed(2, 8).unwrap()), PaletteFormat::None).unwrap();
    let encoded = encode(config, None, &indices, 8, 8, PixelLayout::Indexed8).unwrap();
    let decoded = decode(&encoded).unwrap();
    assert!(!decoded.is_borrowed());
    assert_eq!(decoded.pixels(), &indices[..]);
}

// ── Truecolor roundtrips ─────────────────────────────────────────────

#[test]
fn rgb888_roundtrips_exactly() {
    for bpc in [3, 4] {
        for pixels in [checkerboard(9, 4, 3), noise_pattern(9, 4, 3)] {
            let config = Config::from_raw(24, bpc, 0, PaletteVariant::Falcon).unwrap();
            let encoded = encode(config, None, &pixels, 9, 4, PixelLayout::Rgb8).unwrap();
            assert_eq!(encoded.len(), 15 + 9 * 4 * bpc as usize);
            let decoded = decode(&encoded).unwrap();
            assert_eq!(decoded.layout, PixelLayout::Rgb8);
            assert_eq!(decoded.pixels(), &pixels[..]);
        }
    }
}

#[test]
fn argb8888_roundtrips_exactly() {
    let pixels = noise_pattern(5, 7, 4);
    let config = Config::from_raw(32, 4, 0, PaletteVariant::Falcon).unwrap();
    let encoded = encode(config, None, &pixels, 5, 7, PixelLayout::Rgba8).unwrap();
    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded.layout, PixelLayout::Rgba8);
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn rgb_to_argb_is_opaque() {
    let pixels = checkerboard(4, 4, 3);
    let config = Config::from_raw(32, 4, 0, PaletteVariant::Falcon).unwrap();
    let encoded = encode(config, None, &pixels, 4, 4, PixelLayout::Rgb8).unwrap();
    let decoded = decode(&encoded).unwrap();
    for (out, src) in decoded.pixels().chunks_exact(4).zip(pixels.chunks_exact(3)) {
        assert_eq!(&out[..3], src);
        assert_eq!(out[3], 255);
    }
}

#[test]
fn rgb565_roundtrips_to_quantized() {
    let pixels = noise_pattern(10, 3, 4);
    for bpc in [2, 3, 4] {
        let config = Config::from_raw(16, bpc, 0, PaletteVariant::Falcon).unwrap();
        let encoded = encode(config, None, &pixels, 10, 3, PixelLayout::Rgba8).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.layout, PixelLayout::Rgb8);
        let expected: Vec<u8> = pixels
            .chunks_exact(4)
            .flat_map(|p| unpack_rgb565(pack_rgb565(p[0], p[1], p[2])))
            .collect();
        assert_eq!(decoded.pixels(), &expected[..], "bpc {bpc}");
    }
}

#[test]
fn indexed_source_through_palette_to_truecolor() {
    let indices = noise_indices(6, 6, 4);
    let table = noise_palette(16);
    let config = Config::from_raw(24, 3, 0, PaletteVariant::Falcon).unwrap();
    let encoded = encode(config, Some(&table), &indices, 6, 6, PixelLayout::Indexed8).unwrap();
    let decoded = decode(&encoded).unwrap();
    let expected: Vec<u8> = indices
        .iter()
        .flat_map(|&i| table.get(usize::from(i)).unwrap())
        .collect();
    assert_eq!(decoded.pixels(), &expected[..]);
}

// ── Decode-side conversions ──────────────────────────────────────────

#[test]
fn planar_falcon_to_rgba() {
    let indices = noise_indices(16, 4, 8);
    let table = noise_palette(256);
    let encoded =
        encode(Config::default(), Some(&table), &indices, 16, 4, PixelLayout::Indexed8).unwrap();
    let decoded = decode(&encoded).unwrap();
    let rgba = decoded.to_rgba8().unwrap();
    assert_eq!(rgba.len(), 16 * 4 * 4);
    for (px, &i) in rgba.chunks_exact(4).zip(&indices) {
        let [r, g, b] = table.get(usize::from(i)).unwrap();
        assert_eq!(px, &[r, g, b, 255]);
    }
}

#[test]
fn limits_reject_large_images() {
    let config = Config::new(Some(PixelFormat::planar(1).unwrap()), PaletteFormat::None).unwrap();
    let blank = vec![0; 640 * 400];
    let encoded = encode(config, None, &blank, 640, 400, PixelLayout::Indexed8).unwrap();
    let limits = Limits {
        max_memory_bytes: Some(100_000),
        ..Default::default()
    };
    let err = DecodeRequest::new(&encoded)
        .with_limits(&limits)
        .decode()
        .unwrap_err();
    assert!(matches!(err, UimgError::LimitExceeded(_)));
    assert_eq!(err.category(), ErrorCategory::Limit);
}
