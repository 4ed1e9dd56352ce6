//! Fixed-width chunky pixels.
//!
//! Each pixel is one big-endian chunk of `bytes_per_chunk` bytes, the value
//! right-aligned and zero-padded:
//!
//! | bpp   | chunk value              |
//! |-------|--------------------------|
//! | ≤ 8   | palette index            |
//! | 16    | RGB565 (`RRRRRGGG GGGBBBBB`) |
//! | 24    | `0x00RRGGBB`             |
//! | 32    | `0xAARRGGBB`, 255 = opaque |

use alloc::vec::Vec;

use super::{PixelFormat, check_index};
use crate::error::UimgError;
use crate::palette::{expand, quantize};
use crate::pixel::PixelLayout;

/// Minimum chunk width in bytes for a depth.
pub(crate) fn value_bytes(bits_per_pixel: u8) -> usize {
    usize::from(bits_per_pixel).div_ceil(8)
}

/// Bits set above the value inside a chunk. Always zero when written by
/// [`encode_indices`] or [`encode_truecolor`].
fn padding(value: u32, bits_per_pixel: u8) -> u32 {
    match bits_per_pixel {
        0..=8 => value >> 8,
        16 => value >> 16,
        24 => value >> 24,
        _ => 0,
    }
}

fn push_chunk(out: &mut Vec<u8>, value: u32, bytes_per_chunk: u8) {
    out.extend_from_slice(&value.to_be_bytes()[4 - usize::from(bytes_per_chunk)..]);
}

/// Copy palette indices into chunks, appending to `out`.
pub fn encode_indices(
    indices: &[u8],
    bytes_per_chunk: u8,
    bits_per_pixel: u8,
    out: &mut Vec<u8>,
) -> Result<(), UimgError> {
    PixelFormat::fixed(bytes_per_chunk, bits_per_pixel)?;
    if bytes_per_chunk == 1 {
        for &index in indices {
            check_index(index, bits_per_pixel)?;
        }
        out.extend_from_slice(indices);
        return Ok(());
    }
    out.reserve(indices.len() * usize::from(bytes_per_chunk));
    for &index in indices {
        check_index(index, bits_per_pixel)?;
        push_chunk(out, u32::from(index), bytes_per_chunk);
    }
    Ok(())
}

/// Pack RGB into 5/6/5 bits.
pub fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(quantize(r, 5)) << 11) | (u16::from(quantize(g, 6)) << 5) | u16::from(quantize(b, 5))
}

pub fn unpack_rgb565(value: u16) -> [u8; 3] {
    [
        expand(((value >> 11) & 0x1F) as u8, 5),
        expand(((value >> 5) & 0x3F) as u8, 6),
        expand((value & 0x1F) as u8, 5),
    ]
}

/// Downsample truecolor samples into 16/24/32-bit chunks, appending to `out`.
///
/// `layout` must be `Rgb8` or `Rgba8`; a missing alpha channel is written as
/// opaque (255).
pub fn encode_truecolor(
    pixels: &[u8],
    layout: PixelLayout,
    bytes_per_chunk: u8,
    bits_per_pixel: u8,
    out: &mut Vec<u8>,
) -> Result<(), UimgError> {
    PixelFormat::fixed(bytes_per_chunk, bits_per_pixel)?;
    let bytes_per_pixel = layout.bytes_per_pixel();
    out.reserve(pixels.len() / bytes_per_pixel * usize::from(bytes_per_chunk));

    for px in pixels.chunks_exact(bytes_per_pixel) {
        let [r, g, b, a] = match *px {
            [r, g, b] => [r, g, b, 255],
            [r, g, b, a] => [r, g, b, a],
            _ => {
                return Err(UimgError::LayoutMismatch {
                    expected: PixelLayout::Rgba8,
                    actual: layout,
                });
            }
        };
        let value = match bits_per_pixel {
            16 => u32::from(pack_rgb565(r, g, b)),
            24 => u32::from_be_bytes([0, r, g, b]),
            32 => u32::from_be_bytes([a, r, g, b]),
            other => return Err(UimgError::UnsupportedDepth(other)),
        };
        push_chunk(out, value, bytes_per_chunk);
    }
    Ok(())
}

/// Decode `pixel_count` chunks.
///
/// Indexed depths yield one index per byte; 16 and 24 bpp yield `Rgb8`;
/// 32 bpp yields `Rgba8`.
pub fn decode(
    payload: &[u8],
    pixel_count: usize,
    bytes_per_chunk: u8,
    bits_per_pixel: u8,
) -> Result<Vec<u8>, UimgError> {
    PixelFormat::fixed(bytes_per_chunk, bits_per_pixel)?;
    let chunk_len = usize::from(bytes_per_chunk);
    let needed = pixel_count * chunk_len;
    let data = payload.get(..needed).ok_or(UimgError::TruncatedInput {
        needed,
        actual: payload.len(),
    })?;

    let out_bpp = match bits_per_pixel {
        0..=8 => 1,
        32 => 4,
        _ => 3,
    };
    let mut out = Vec::with_capacity(pixel_count * out_bpp);
    let mut padded = 0usize;

    for chunk in data.chunks_exact(chunk_len) {
        let value = chunk.iter().fold(0u32, |v, &b| (v << 8) | u32::from(b));
        if padding(value, bits_per_pixel) != 0 {
            padded += 1;
        }
        match bits_per_pixel {
            0..=8 => {
                let index = u8::try_from(value).map_err(|_| UimgError::IndexOutOfRange {
                    index: value,
                    bits_per_pixel,
                })?;
                check_index(index, bits_per_pixel)?;
                out.push(index);
            }
            16 => out.extend_from_slice(&unpack_rgb565(value as u16)),
            24 => out.extend_from_slice(&value.to_be_bytes()[1..]),
            32 => {
                let [a, r, g, b] = value.to_be_bytes();
                out.extend_from_slice(&[r, g, b, a]);
            }
            other => return Err(UimgError::UnsupportedDepth(other)),
        }
    }
    if padded > 0 {
        log::warn!("{padded} of {pixel_count} chunks have non-zero padding, ignored");
    }
    Ok(out)
}
