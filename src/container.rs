//! UIMG container header.
//!
//! All multi-byte fields are big-endian:
//!
//! ```text
//! 0   5   id "UIMG\0"
//! 5   2   version (major << 8 | minor)
//! 7   2   flags, bits 1..0 = palette kind (00 none, 01 STE, 10 TT, 11 Falcon)
//! 9   1   bits per pixel (0 = no bitmap)
//! 10  1   bytes per chunk, signed (-1 packed, 0 planar, 1..4 fixed)
//! 11  2   width   (only if bits per pixel != 0)
//! 13  2   height  (only if bits per pixel != 0)
//! ..      palette, 2^bpp entries of 2 (STE/TT) or 4 (Falcon) bytes
//! ..      pixel payload
//! ```

use alloc::vec::Vec;

use crate::error::UimgError;
use crate::palette::{PaletteVariant, slot_count};
use crate::pixels::PixelFormat;

/// Container id, NUL-terminated.
pub const MAGIC: &[u8; 5] = b"UIMG\0";

/// Format version written by this crate (1.0).
pub const VERSION: u16 = 0x0100;

/// Header length without the dimensions.
pub const BASE_HEADER_LEN: usize = 11;

/// Header length when width and height are present.
pub const FULL_HEADER_LEN: usize = BASE_HEADER_LEN + 4;

const PALETTE_KIND_MASK: u16 = 0b11;

/// Parsed container header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: u16,
    /// Palette registers the palette is stored for, if any.
    pub palette: Option<PaletteVariant>,
    pub bits_per_pixel: u8,
    /// Raw signed chunk size as stored on disk.
    pub bytes_per_chunk: i8,
    /// 0 when the container has no bitmap.
    pub width: u16,
    /// 0 when the container has no bitmap.
    pub height: u16,
}

impl ContainerHeader {
    pub(crate) fn new(
        pixel_format: Option<PixelFormat>,
        palette: Option<PaletteVariant>,
        width: u16,
        height: u16,
    ) -> Self {
        let (bits_per_pixel, bytes_per_chunk, width, height) = match pixel_format {
            Some(format) => (
                format.bits_per_pixel(),
                format.bytes_per_chunk(),
                width,
                height,
            ),
            None => (0, 0, 0, 0),
        };
        Self {
            version: VERSION,
            palette,
            bits_per_pixel,
            bytes_per_chunk,
            width,
            height,
        }
    }

    /// Whether a pixel payload follows the palette.
    pub fn has_bitmap(&self) -> bool {
        self.bits_per_pixel != 0
    }

    /// Pixel payload format, `None` for palette-only or header-only files.
    pub fn pixel_format(&self) -> Result<Option<PixelFormat>, UimgError> {
        if !self.has_bitmap() {
            return Ok(None);
        }
        PixelFormat::from_header(self.bits_per_pixel, self.bytes_per_chunk).map(Some)
    }

    pub fn flags(&self) -> u16 {
        self.palette.map_or(0, PaletteVariant::flag)
    }

    /// Length of the encoded header itself.
    pub fn encoded_len(&self) -> usize {
        if self.has_bitmap() {
            FULL_HEADER_LEN
        } else {
            BASE_HEADER_LEN
        }
    }

    /// Number of palette entries stored, 0 without a palette.
    pub fn palette_slots(&self) -> usize {
        match self.palette {
            Some(_) => slot_count(self.bits_per_pixel),
            None => 0,
        }
    }

    /// Palette size in bytes.
    pub fn palette_len(&self) -> usize {
        self.palette
            .map_or(0, |variant| self.palette_slots() * variant.word_bytes())
    }

    /// Pixel payload size in bytes.
    pub fn payload_len(&self) -> Result<usize, UimgError> {
        match self.pixel_format()? {
            Some(format) => format
                .payload_len(u32::from(self.width), u32::from(self.height))
                .ok_or(UimgError::DimensionsTooLarge {
                    width: u32::from(self.width),
                    height: u32::from(self.height),
                }),
            None => Ok(0),
        }
    }

    /// Header + palette + payload.
    pub fn total_len(&self) -> Result<usize, UimgError> {
        Ok(self.encoded_len() + self.palette_len() + self.payload_len()?)
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&self.flags().to_be_bytes());
        out.push(self.bits_per_pixel);
        out.push(self.bytes_per_chunk as u8);
        if self.has_bitmap() {
            out.extend_from_slice(&self.width.to_be_bytes());
            out.extend_from_slice(&self.height.to_be_bytes());
        }
    }

    /// Parse and validate a header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, UimgError> {
        let id_len = data.len().min(MAGIC.len());
        if data[..id_len] != MAGIC[..id_len] {
            return Err(UimgError::BadMagic);
        }
        if data.len() < BASE_HEADER_LEN {
            return Err(UimgError::TruncatedInput {
                needed: BASE_HEADER_LEN,
                actual: data.len(),
            });
        }

        let version = u16::from_be_bytes([data[5], data[6]]);
        let flags = u16::from_be_bytes([data[7], data[8]]);
        let bits_per_pixel = data[9];
        let bytes_per_chunk = data[10] as i8;

        if version >> 8 != VERSION >> 8 {
            log::warn!("UIMG version {version:#06x} differs from supported {VERSION:#06x}");
        }
        if flags & !PALETTE_KIND_MASK != 0 {
            log::warn!("ignoring reserved UIMG flag bits {flags:#06x}");
        }

        let (width, height) = if bits_per_pixel != 0 {
            let dims = data
                .get(BASE_HEADER_LEN..FULL_HEADER_LEN)
                .ok_or(UimgError::TruncatedInput {
                    needed: FULL_HEADER_LEN,
                    actual: data.len(),
                })?;
            (
                u16::from_be_bytes([dims[0], dims[1]]),
                u16::from_be_bytes([dims[2], dims[3]]),
            )
        } else {
            if bytes_per_chunk != 0 {
                return Err(UimgError::InvalidHeader(alloc::format!(
                    "bytes per chunk {bytes_per_chunk} without a bitmap"
                )));
            }
            (0, 0)
        };

        let header = Self {
            version,
            palette: PaletteVariant::from_flag(flags),
            bits_per_pixel,
            bytes_per_chunk,
            width,
            height,
        };

        if let Some(format) = header.pixel_format()? {
            format.check_width(u32::from(width))?;
        }
        if let Some(variant) = header.palette {
            if bits_per_pixel > variant.max_bits_per_pixel() {
                return Err(UimgError::InvalidHeader(alloc::format!(
                    "{variant:?} palette with {bits_per_pixel} bits per pixel"
                )));
            }
        }

        log::debug!(
            "parsed UIMG header: {width}x{height}, {bits_per_pixel} bpp, \
             chunk {bytes_per_chunk}, palette {:?}",
            header.palette
        );
        Ok(header)
    }
}
