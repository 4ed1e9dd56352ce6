//! # zenuimg
//!
//! Encoder and decoder for UIMG, a container for Atari ST/STE/TT/Falcon
//! screen data: hardware palette registers plus pixels in the machines'
//! native planar or chunky layouts.
//!
//! ## Supported Formats
//!
//! ### Palettes
//! - **STE**: 16-bit registers, 9 or 12 bits (ST palettes are the 9-bit case)
//! - **TT**: 16-bit `0x0RGB` registers, 9 or 12 bits
//! - **Falcon**: 32-bit VIDEL registers, 9, 12, 18 or 24 bits
//!
//! ### Pixels
//! - **Planar**: interleaved bitplanes at 1, 2, 4, 6 or 8 bpp
//! - **Packed chunky**: 1, 2 or 4 bpp, several pixels per byte
//! - **Fixed chunky**: 1..4 bytes per pixel holding an index (≤ 8 bpp),
//!   RGB565, RGB888 or ARGB8888
//!
//! ## Zero-Copy Decoding
//!
//! Single-byte fixed-chunky indexed payloads are returned as a borrowed slice
//! of the input. Planar, packed and multi-byte payloads are converted into an
//! owned buffer.
//!
//! ## Non-Goals
//!
//! - Color quantization or dithering (supply indices and a palette)
//! - Reading other image formats
//! - Compression
//!
//! ## Usage
//!
//! ```
//! use zenuimg::{ColorTable, Config, DecodeRequest, EncodeRequest, ImageInfo,
//!               PaletteFormat, PixelFormat, PixelLayout};
//!
//! let config = Config::new(Some(PixelFormat::planar(4)?), PaletteFormat::ste(12)?)?;
//! let palette = ColorTable::new(vec![[0, 0, 0], [255, 255, 255]]);
//! let indices = vec![0u8; 320 * 200];
//!
//! let data = EncodeRequest::new(config)
//!     .with_palette(&palette)
//!     .encode(&indices, 320, 200, PixelLayout::Indexed8)?;
//! assert_eq!(data.len(), 32047);
//!
//! // Read the header without decoding
//! let info = ImageInfo::from_bytes(&data)?;
//! assert_eq!((info.width, info.height), (320, 200));
//!
//! let decoded = DecodeRequest::new(&data).decode()?;
//! assert_eq!(decoded.pixels(), &indices[..]);
//! assert_eq!(decoded.palette().unwrap().get(1), Some([255, 255, 255]));
//! # Ok::<(), zenuimg::UimgError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod bitlayout;
pub mod container;
pub mod palette;
pub mod pixels;

mod config;
mod decode;
mod encode;
mod error;
mod info;
mod limits;
mod pixel;

use alloc::vec::Vec;

// Re-exports
pub use bitlayout::{BitField, BitLayout};
pub use config::Config;
pub use container::ContainerHeader;
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::EncodeRequest;
pub use error::{ErrorCategory, UimgError};
pub use info::ImageInfo;
pub use limits::Limits;
#[cfg(feature = "rgb")]
pub use pixel::DecodePixel;
pub use pixel::PixelLayout;
pub use palette::{
    ColorTable, FALCON_LAYOUT, Falcon, PaletteFormat, PaletteRegister, PaletteVariant, STE_LAYOUT,
    Ste, TT_LAYOUT, Tt,
};
pub use pixels::PixelFormat;

/// Decode a UIMG container, assuming full-precision palette registers.
pub fn decode(data: &[u8]) -> Result<DecodeOutput<'_>, UimgError> {
    DecodeRequest::new(data).decode()
}

/// Encode a pixel grid with `config`, writing `palette` if the config has one.
pub fn encode(
    config: Config,
    palette: Option<&ColorTable>,
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
) -> Result<Vec<u8>, UimgError> {
    let request = EncodeRequest::new(config);
    match palette {
        Some(table) => request.with_palette(table).encode(pixels, width, height, layout),
        None => request.encode(pixels, width, height, layout),
    }
}

/// Encode a typed RGB or RGBA image at a truecolor depth.
#[cfg(feature = "imgref")]
pub fn encode_imgref<P: DecodePixel>(
    config: Config,
    img: imgref::ImgRef<'_, P>,
) -> Result<Vec<u8>, UimgError>
where
    [P]: rgb::ComponentBytes<u8>,
{
    EncodeRequest::new(config).encode_imgref(img)
}
