//! Bitplane interleave (chunky-to-planar and back).
//!
//! Every group of 16 pixels becomes `bits_per_pixel` big-endian words. Word
//! `j` holds bit `j` of each pixel's index, pixel 0 in bit 15. This is the
//! screen layout of the ST shifter and the Falcon VIDEL in bitplane modes.

use alloc::vec::Vec;

use super::{PixelFormat, check_index};
use crate::error::UimgError;

/// Interleave palette indices into bitplane words, appending to `out`.
///
/// `indices` is a row-major grid `width` pixels wide; `width` must be a
/// multiple of 16.
pub fn encode(
    indices: &[u8],
    width: u32,
    bits_per_pixel: u8,
    out: &mut Vec<u8>,
) -> Result<(), UimgError> {
    PixelFormat::planar(bits_per_pixel)?;
    if width % 16 != 0 {
        return Err(UimgError::DimensionNotAligned { width });
    }
    let planes_count = usize::from(bits_per_pixel);
    out.reserve(indices.len() / 8 * planes_count);

    for run in indices.chunks_exact(16) {
        let mut planes = [0u16; 8];
        for (i, &index) in run.iter().enumerate() {
            check_index(index, bits_per_pixel)?;
            for (j, plane) in planes[..planes_count].iter_mut().enumerate() {
                *plane |= u16::from((index >> j) & 1) << (15 - i);
            }
        }
        for plane in &planes[..planes_count] {
            out.extend_from_slice(&plane.to_be_bytes());
        }
    }
    Ok(())
}

/// De-interleave `pixel_count` pixels from bitplane words.
///
/// `pixel_count` must be a multiple of 16.
pub fn decode(
    payload: &[u8],
    pixel_count: usize,
    bits_per_pixel: u8,
) -> Result<Vec<u8>, UimgError> {
    PixelFormat::planar(bits_per_pixel)?;
    if pixel_count % 16 != 0 {
        return Err(UimgError::PixelCountNotAligned {
            pixel_count,
            group: 16,
        });
    }
    let planes_count = usize::from(bits_per_pixel);
    let group_bytes = planes_count * 2;
    let needed = pixel_count / 16 * group_bytes;
    let data = payload.get(..needed).ok_or(UimgError::TruncatedInput {
        needed,
        actual: payload.len(),
    })?;

    let mut out = Vec::with_capacity(pixel_count);
    for group in data.chunks_exact(group_bytes) {
        let mut planes = [0u16; 8];
        for (plane, word) in planes.iter_mut().zip(group.chunks_exact(2)) {
            *plane = u16::from_be_bytes([word[0], word[1]]);
        }
        for i in 0..16 {
            let index = planes[..planes_count]
                .iter()
                .enumerate()
                .fold(0u8, |acc, (j, plane)| {
                    acc | ((((plane >> (15 - i)) & 1) as u8) << j)
                });
            out.push(index);
        }
    }
    Ok(out)
}
