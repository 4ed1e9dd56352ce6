//! Pixel payload codecs.
//!
//! - [`planar`]: bitplane interleave in 16-pixel words (c2p / p2c).
//! - [`packed`]: 2, 4 or 8 indices per byte, first pixel in the high bits.
//! - [`fixed`]: one fixed-width big-endian chunk per pixel (index, RGB565,
//!   RGB888 or ARGB8888).

pub mod fixed;
pub mod packed;
pub mod planar;

use alloc::vec::Vec;

use crate::error::UimgError;
use crate::pixel::PixelLayout;

const PLANAR_DEPTHS: &[u8] = &[1, 2, 4, 6, 8];
const PACKED_DEPTHS: &[u8] = &[1, 2, 4];
const FIXED_DEPTHS: &[u8] = &[1, 2, 4, 6, 8, 16, 24, 32];

/// How pixels are laid out in the container payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Interleaved bitplanes, `bits_per_pixel` 16-bit words per 16 pixels.
    Planar { bits_per_pixel: u8 },
    /// Sub-byte chunky pixels, `8 / bits_per_pixel` per byte.
    PackedChunky { bits_per_pixel: u8 },
    /// One `bytes_per_chunk`-byte chunk per pixel.
    FixedChunky {
        bytes_per_chunk: u8,
        bits_per_pixel: u8,
    },
}

impl PixelFormat {
    pub fn planar(bits_per_pixel: u8) -> Result<Self, UimgError> {
        let format = Self::Planar { bits_per_pixel };
        format.check()?;
        Ok(format)
    }

    pub fn packed(bits_per_pixel: u8) -> Result<Self, UimgError> {
        let format = Self::PackedChunky { bits_per_pixel };
        format.check()?;
        Ok(format)
    }

    pub fn fixed(bytes_per_chunk: u8, bits_per_pixel: u8) -> Result<Self, UimgError> {
        let format = Self::FixedChunky {
            bytes_per_chunk,
            bits_per_pixel,
        };
        format.check()?;
        Ok(format)
    }

    /// Build from the header's `bitsPerPixel` / signed `bytesPerChunk` pair.
    pub fn from_header(bits_per_pixel: u8, bytes_per_chunk: i8) -> Result<Self, UimgError> {
        let format = match bytes_per_chunk {
            -1 => Self::PackedChunky { bits_per_pixel },
            0 => Self::Planar { bits_per_pixel },
            1..=4 => Self::FixedChunky {
                bytes_per_chunk: bytes_per_chunk as u8,
                bits_per_pixel,
            },
            other => return Err(UimgError::UnsupportedChunkSize(other)),
        };
        format.check().map_err(|e| match e {
            UimgError::InvalidConfig(msg) => UimgError::InvalidHeader(msg),
            other => other,
        })?;
        Ok(format)
    }

    pub fn bits_per_pixel(&self) -> u8 {
        match *self {
            Self::Planar { bits_per_pixel }
            | Self::PackedChunky { bits_per_pixel }
            | Self::FixedChunky { bits_per_pixel, .. } => bits_per_pixel,
        }
    }

    /// The header's signed `bytesPerChunk` value.
    pub fn bytes_per_chunk(&self) -> i8 {
        match *self {
            Self::PackedChunky { .. } => -1,
            Self::Planar { .. } => 0,
            Self::FixedChunky {
                bytes_per_chunk, ..
            } => bytes_per_chunk as i8,
        }
    }

    /// Whether pixels are palette indices (as opposed to direct color).
    pub fn is_indexed(&self) -> bool {
        self.bits_per_pixel() <= 8
    }

    /// Planar and packed payloads need rows made of whole 16-pixel groups.
    pub fn requires_alignment(&self) -> bool {
        !matches!(self, Self::FixedChunky { .. })
    }

    /// Layout of the pixel grid this format decodes to.
    pub fn decoded_layout(&self) -> PixelLayout {
        match self.bits_per_pixel() {
            0..=8 => PixelLayout::Indexed8,
            32 => PixelLayout::Rgba8,
            _ => PixelLayout::Rgb8,
        }
    }

    /// Payload size in bytes for a `width` x `height` grid.
    pub fn payload_len(&self, width: u32, height: u32) -> Option<usize> {
        let pixels = (width as usize).checked_mul(height as usize)?;
        match *self {
            Self::FixedChunky {
                bytes_per_chunk, ..
            } => pixels.checked_mul(usize::from(bytes_per_chunk)),
            _ => Some(pixels.checked_mul(usize::from(self.bits_per_pixel()))? / 8),
        }
    }

    pub(crate) fn check(&self) -> Result<(), UimgError> {
        let bpp = self.bits_per_pixel();
        let depths = match self {
            Self::Planar { .. } => PLANAR_DEPTHS,
            Self::PackedChunky { .. } => PACKED_DEPTHS,
            Self::FixedChunky { .. } => FIXED_DEPTHS,
        };
        if !depths.contains(&bpp) {
            return Err(UimgError::UnsupportedDepth(bpp));
        }
        if let Self::FixedChunky {
            bytes_per_chunk, ..
        } = *self
        {
            if !(1..=4).contains(&bytes_per_chunk) {
                return Err(UimgError::UnsupportedChunkSize(bytes_per_chunk as i8));
            }
            if fixed::value_bytes(bpp) > usize::from(bytes_per_chunk) {
                return Err(UimgError::InvalidConfig(alloc::format!(
                    "{bpp} bpp does not fit in {bytes_per_chunk}-byte chunks"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn check_width(&self, width: u32) -> Result<(), UimgError> {
        if self.requires_alignment() && width % 16 != 0 {
            return Err(UimgError::DimensionNotAligned { width });
        }
        Ok(())
    }
}

/// Encode a grid of palette indices.
pub(crate) fn encode_indices(
    format: PixelFormat,
    indices: &[u8],
    width: u32,
    out: &mut Vec<u8>,
) -> Result<(), UimgError> {
    match format {
        PixelFormat::Planar { bits_per_pixel } => {
            planar::encode(indices, width, bits_per_pixel, out)
        }
        PixelFormat::PackedChunky { bits_per_pixel } => {
            packed::encode(indices, width, bits_per_pixel, out)
        }
        PixelFormat::FixedChunky {
            bytes_per_chunk,
            bits_per_pixel,
        } => fixed::encode_indices(indices, bytes_per_chunk, bits_per_pixel, out),
    }
}

/// Decode a payload into the grid layout given by [`PixelFormat::decoded_layout`].
pub(crate) fn decode(
    format: PixelFormat,
    payload: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, UimgError> {
    let pixel_count = width as usize * height as usize;
    match format {
        PixelFormat::Planar { bits_per_pixel } => {
            planar::decode(payload, pixel_count, bits_per_pixel)
        }
        PixelFormat::PackedChunky { bits_per_pixel } => {
            packed::decode(payload, pixel_count, bits_per_pixel)
        }
        PixelFormat::FixedChunky {
            bytes_per_chunk,
            bits_per_pixel,
        } => fixed::decode(payload, pixel_count, bytes_per_chunk, bits_per_pixel),
    }
}

/// Fail with `IndexOutOfRange` if `index` needs more than `bits_per_pixel` bits.
#[inline]
pub(crate) fn check_index(index: u8, bits_per_pixel: u8) -> Result<(), UimgError> {
    if bits_per_pixel < 8 && index >> bits_per_pixel != 0 {
        return Err(UimgError::IndexOutOfRange {
            index: u32::from(index),
            bits_per_pixel,
        });
    }
    Ok(())
}
