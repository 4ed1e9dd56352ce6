//! Sub-byte chunky pixels: 8, 4 or 2 indices per byte at 1, 2 or 4 bpp.
//!
//! The first pixel of each byte occupies the most significant bits.

use alloc::vec;
use alloc::vec::Vec;

use super::{PixelFormat, check_index};
use crate::error::UimgError;

/// Pack palette indices into bytes, appending to `out`.
///
/// `width` must be a multiple of 16, which also keeps every row a whole
/// number of bytes.
pub fn encode(
    indices: &[u8],
    width: u32,
    bits_per_pixel: u8,
    out: &mut Vec<u8>,
) -> Result<(), UimgError> {
    PixelFormat::packed(bits_per_pixel)?;
    if width % 16 != 0 {
        return Err(UimgError::DimensionNotAligned { width });
    }
    let pixels_per_chunk = 8 / usize::from(bits_per_pixel);
    out.reserve(indices.len() / pixels_per_chunk);

    for run in indices.chunks_exact(pixels_per_chunk) {
        let mut chunk = 0u8;
        for &index in run {
            check_index(index, bits_per_pixel)?;
            chunk = (chunk << bits_per_pixel) | index;
        }
        out.push(chunk);
    }
    Ok(())
}

/// Unpack `pixel_count` indices from packed bytes.
///
/// `pixel_count` must fill whole bytes.
pub fn decode(
    payload: &[u8],
    pixel_count: usize,
    bits_per_pixel: u8,
) -> Result<Vec<u8>, UimgError> {
    PixelFormat::packed(bits_per_pixel)?;
    let pixels_per_chunk = 8 / usize::from(bits_per_pixel);
    if pixel_count % pixels_per_chunk != 0 {
        return Err(UimgError::PixelCountNotAligned {
            pixel_count,
            group: pixels_per_chunk,
        });
    }
    let needed = pixel_count * usize::from(bits_per_pixel) / 8;
    let data = payload.get(..needed).ok_or(UimgError::TruncatedInput {
        needed,
        actual: payload.len(),
    })?;
    let mut out = vec![0u8; pixel_count];
    expand_bits_to_byte(bits_per_pixel, data, &mut out);
    Ok(out)
}

/// Expand sub-byte bit depths (1, 2, 4 bits per pixel) to one index per byte.
fn expand_bits_to_byte(depth: u8, input: &[u8], out: &mut [u8]) {
    let pixels_per_chunk = 8 / usize::from(depth);
    let mask = (1u8 << depth) - 1;

    for (out_vals, &in_val) in out.chunks_exact_mut(pixels_per_chunk).zip(input) {
        for (pos, out_val) in out_vals.iter_mut().enumerate() {
            let shift = 8 - usize::from(depth) * (pos + 1);
            *out_val = (in_val >> shift) & mask;
        }
    }
}
