use crate::error::UimgError;
use crate::palette::{PaletteFormat, PaletteVariant};
use crate::pixels::PixelFormat;

/// Conversion settings: how pixels are laid out and which palette is written.
///
/// A `Config` is always valid once constructed; all cross-field checks run in
/// [`Config::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    pixel_format: Option<PixelFormat>,
    palette: PaletteFormat,
}

impl Default for Config {
    /// 8 bpp planar with a 24-bit Falcon palette.
    fn default() -> Self {
        Self {
            pixel_format: Some(PixelFormat::Planar { bits_per_pixel: 8 }),
            palette: PaletteFormat::Falcon { bits: 24 },
        }
    }
}

impl Config {
    /// Validate and build a config.
    ///
    /// `pixel_format = None` produces a palette-only (or, without a palette,
    /// header-only) container.
    pub fn new(
        pixel_format: Option<PixelFormat>,
        palette: PaletteFormat,
    ) -> Result<Self, UimgError> {
        let config = Self {
            pixel_format,
            palette,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build from raw option values: bits per pixel (0 = no bitmap), signed
    /// bytes per chunk, palette bits (0 = no palette) and the register family
    /// the palette is written for.
    ///
    /// A packed chunk size (-1) at 8 bpp or more is treated as whole-byte
    /// fixed chunks.
    pub fn from_raw(
        bits_per_pixel: u8,
        bytes_per_chunk: i8,
        palette_bits: u8,
        variant: PaletteVariant,
    ) -> Result<Self, UimgError> {
        let bytes_per_chunk = if bytes_per_chunk == -1 && bits_per_pixel >= 8 {
            (bits_per_pixel / 8) as i8
        } else {
            bytes_per_chunk
        };

        let pixel_format = match (bits_per_pixel, bytes_per_chunk) {
            (0, 0) => None,
            (0, _) => {
                return Err(UimgError::InvalidConfig(
                    "bytes per chunk requires a bitmap".into(),
                ));
            }
            (bpp, -1) => Some(PixelFormat::packed(bpp)?),
            (bpp, 0) => Some(PixelFormat::planar(bpp)?),
            (bpp, bpc @ 1..=4) => Some(PixelFormat::fixed(bpc as u8, bpp)?),
            (_, other) => return Err(UimgError::UnsupportedChunkSize(other)),
        };

        let palette = match (palette_bits, variant) {
            (0, _) => PaletteFormat::None,
            (bits, PaletteVariant::Ste) => PaletteFormat::ste(bits)?,
            (bits, PaletteVariant::Tt) => PaletteFormat::tt(bits)?,
            (bits, PaletteVariant::Falcon) => PaletteFormat::falcon(bits)?,
        };

        Self::new(pixel_format, palette)
    }

    pub fn pixel_format(&self) -> Option<PixelFormat> {
        self.pixel_format
    }

    pub fn palette(&self) -> PaletteFormat {
        self.palette
    }

    /// Bits per pixel as written to the header, 0 without a bitmap.
    pub fn bits_per_pixel(&self) -> u8 {
        self.pixel_format.map_or(0, |f| f.bits_per_pixel())
    }

    /// Signed bytes per chunk as written to the header.
    pub fn bytes_per_chunk(&self) -> i8 {
        self.pixel_format.map_or(0, |f| f.bytes_per_chunk())
    }

    /// Check depth, chunk size and palette precision, then their combination.
    pub fn validate(&self) -> Result<(), UimgError> {
        if let Some(format) = &self.pixel_format {
            format.check()?;
        }
        self.palette.check()?;

        let bpp = self.bits_per_pixel();
        if let Some(variant) = self.palette.variant() {
            if bpp > 8 {
                return Err(UimgError::InvalidConfig(alloc::format!(
                    "no palette allowed with {bpp} bits per pixel"
                )));
            }
            if bpp > variant.max_bits_per_pixel() {
                return Err(UimgError::InvalidConfig(alloc::format!(
                    "{variant:?} palette requires {} or fewer bits per pixel, got {bpp}",
                    variant.max_bits_per_pixel()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_planar_8_falcon_24() {
        let config = Config::default();
        assert_eq!(config.bits_per_pixel(), 8);
        assert_eq!(config.bytes_per_chunk(), 0);
        assert_eq!(config.palette(), PaletteFormat::Falcon { bits: 24 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ste_needs_four_bpp_or_less() {
        let planar4 = Some(PixelFormat::planar(4).unwrap());
        assert!(Config::new(planar4, PaletteFormat::ste(12).unwrap()).is_ok());
        assert!(matches!(
            Config::new(Some(PixelFormat::planar(8).unwrap()), PaletteFormat::ste(12).unwrap()),
            Err(UimgError::InvalidConfig(_))
        ));
        let planar8 = Some(PixelFormat::planar(8).unwrap());
        assert!(Config::new(planar8, PaletteFormat::tt(9).unwrap()).is_ok());
    }

    #[test]
    fn no_palette_for_truecolor() {
        let format = PixelFormat::fixed(2, 16).unwrap();
        assert!(Config::new(Some(format), PaletteFormat::None).is_ok());
        assert!(matches!(
            Config::new(Some(format), PaletteFormat::Falcon { bits: 24 }),
            Err(UimgError::InvalidConfig(_))
        ));
    }

    #[test]
    fn hand_built_variants_are_checked() {
        assert!(matches!(
            Config::new(Some(PixelFormat::Planar { bits_per_pixel: 3 }), PaletteFormat::None),
            Err(UimgError::UnsupportedDepth(3))
        ));
        assert!(matches!(
            Config::new(None, PaletteFormat::Ste { bits: 24 }),
            Err(UimgError::InvalidPaletteBits {
                bits: 24,
                variant: PaletteVariant::Ste
            })
        ));
    }

    #[test]
    fn from_raw_mapping() {
        let config = Config::from_raw(4, -1, 12, PaletteVariant::Tt).unwrap();
        assert_eq!(config.pixel_format(), Some(PixelFormat::PackedChunky { bits_per_pixel: 4 }));
        assert_eq!(config.palette(), PaletteFormat::Tt { bits: 12 });

        // packed at 8 bpp and above becomes whole-byte chunks
        let config = Config::from_raw(24, -1, 0, PaletteVariant::Falcon).unwrap();
        assert_eq!(config.bytes_per_chunk(), 3);
        assert!(config.palette().is_none());

        let config = Config::from_raw(0, 0, 18, PaletteVariant::Falcon).unwrap();
        assert_eq!(config.pixel_format(), None);
        assert_eq!(config.bits_per_pixel(), 0);
    }

    #[test]
    fn from_raw_rejects() {
        assert!(matches!(
            Config::from_raw(0, 2, 0, PaletteVariant::Falcon),
            Err(UimgError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_raw(32, 2, 0, PaletteVariant::Falcon),
            Err(UimgError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_raw(8, 5, 0, PaletteVariant::Falcon),
            Err(UimgError::UnsupportedChunkSize(5))
        ));
        assert!(matches!(
            Config::from_raw(16, 2, 24, PaletteVariant::Falcon),
            Err(UimgError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_raw(5, 0, 24, PaletteVariant::Falcon),
            Err(UimgError::UnsupportedDepth(5))
        ));
    }
}
