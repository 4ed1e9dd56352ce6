use crate::container::ContainerHeader;
use crate::error::UimgError;
use crate::palette::PaletteVariant;
use crate::pixel::PixelLayout;
use crate::pixels::PixelFormat;

/// Header summary of a UIMG container, read without touching the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u8,
    /// `None` for palette-only and header-only containers.
    pub pixel_format: Option<PixelFormat>,
    pub palette: Option<PaletteVariant>,
    pub version: u16,
    /// Byte offset of the palette (equal to the header length).
    pub palette_offset: usize,
    /// Byte offset of the pixel payload.
    pub payload_offset: usize,
    pub payload_len: usize,
}

impl ImageInfo {
    /// Read container bytes. Only the header has to be present.
    pub fn from_bytes(data: &[u8]) -> Result<Self, UimgError> {
        let header = ContainerHeader::parse(data)?;
        let palette_offset = header.encoded_len();
        Ok(Self {
            width: u32::from(header.width),
            height: u32::from(header.height),
            bits_per_pixel: header.bits_per_pixel,
            pixel_format: header.pixel_format()?,
            palette: header.palette,
            version: header.version,
            palette_offset,
            payload_offset: palette_offset + header.palette_len(),
            payload_len: header.payload_len()?,
        })
    }

    pub fn has_bitmap(&self) -> bool {
        self.pixel_format.is_some()
    }

    /// Layout [`crate::DecodeRequest`] will produce.
    pub fn native_layout(&self) -> Option<PixelLayout> {
        self.pixel_format.map(|f| f.decoded_layout())
    }

    /// Size of a complete container with this header.
    pub fn total_len(&self) -> usize {
        self.payload_offset + self.payload_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorTable, Config, EncodeRequest, PaletteFormat};

    #[test]
    fn header_only_prefix_is_enough() {
        let format = PixelFormat::planar(4).unwrap();
        let config = Config::new(Some(format), PaletteFormat::ste(12).unwrap()).unwrap();
        let table = ColorTable::default();
        let data = EncodeRequest::new(config)
            .with_palette(&table)
            .encode(&[0u8; 320 * 200], 320, 200, PixelLayout::Indexed8)
            .unwrap();

        let info = ImageInfo::from_bytes(&data[..15]).unwrap();
        assert_eq!((info.width, info.height), (320, 200));
        assert_eq!(info.palette, Some(PaletteVariant::Ste));
        assert_eq!(info.palette_offset, 15);
        assert_eq!(info.payload_offset, 47);
        assert_eq!(info.total_len(), 32047);
        assert_eq!(info.total_len(), data.len());
        assert_eq!(info.native_layout(), Some(PixelLayout::Indexed8));
    }

    #[test]
    fn other_formats_rejected() {
        assert!(matches!(
            ImageInfo::from_bytes(b"P6\n1 1\n255\n\0\0\0"),
            Err(UimgError::BadMagic)
        ));
    }
}
