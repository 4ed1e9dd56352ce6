use alloc::vec::Vec;

use crate::config::Config;
use crate::container::ContainerHeader;
use crate::error::UimgError;
use crate::palette::{ColorTable, encode_palette};
use crate::pixel::PixelLayout;
use crate::pixels::{self, PixelFormat, fixed};

/// Builder for encoding a pixel grid into a UIMG container.
///
/// ```
/// use zenuimg::{Config, EncodeRequest, PaletteFormat, PixelFormat, PixelLayout, ColorTable};
///
/// let config = Config::new(Some(PixelFormat::planar(4)?), PaletteFormat::ste(12)?)?;
/// let palette = ColorTable::new(vec![[0, 0, 0], [255, 255, 255]]);
/// let indices = vec![1u8; 16 * 2];
/// let bytes = EncodeRequest::new(config)
///     .with_palette(&palette)
///     .encode(&indices, 16, 2, PixelLayout::Indexed8)?;
/// assert_eq!(bytes.len(), 15 + 16 * 2 + 16);
/// # Ok::<(), zenuimg::UimgError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EncodeRequest<'a> {
    config: Config,
    palette: Option<&'a ColorTable>,
}

impl<'a> EncodeRequest<'a> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            palette: None,
        }
    }

    /// Color table written to the palette section, and used to expand
    /// indexed sources into 16/24/32-bit chunks.
    pub fn with_palette(mut self, palette: &'a ColorTable) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encode `width` x `height` pixels of `layout` into container bytes.
    ///
    /// Indexed depths take `Indexed8` input. Truecolor depths take `Rgb8` or
    /// `Rgba8`, or `Indexed8` together with a palette. Without a bitmap
    /// (`pixel_format = None`) the pixel arguments are ignored.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> Result<Vec<u8>, UimgError> {
        self.config.validate()?;
        let format = self.config.pixel_format();

        let (w16, h16) = match format {
            Some(format) => {
                let w16 = u16::try_from(width)
                    .map_err(|_| UimgError::DimensionsTooLarge { width, height })?;
                let h16 = u16::try_from(height)
                    .map_err(|_| UimgError::DimensionsTooLarge { width, height })?;
                format.check_width(width)?;
                (w16, h16)
            }
            None => (0, 0),
        };

        let header = ContainerHeader::new(format, self.config.palette().variant(), w16, h16);
        let mut out = Vec::with_capacity(header.total_len()?);
        header.write(&mut out);

        if let Some(variant) = self.config.palette().variant() {
            let table = self.palette.ok_or_else(|| {
                UimgError::InvalidConfig("palette format set but no color table given".into())
            })?;
            encode_palette(
                table,
                variant,
                self.config.palette().bits(),
                header.palette_slots(),
                &mut out,
            )?;
        }

        if let Some(format) = format {
            let pixel_count = width as usize * height as usize;
            let needed = pixel_count * layout.bytes_per_pixel();
            let pixels = pixels.get(..needed).ok_or(UimgError::BufferTooSmall {
                needed,
                actual: pixels.len(),
            })?;
            let start = out.len();
            self.encode_payload(format, pixels, width, layout, &mut out)?;
            log::trace!("wrote {} payload bytes as {format:?}", out.len() - start);
        }

        log::debug!(
            "encoded UIMG {width}x{height}, {} bpp, palette {:?}, {} bytes",
            header.bits_per_pixel,
            header.palette,
            out.len()
        );
        Ok(out)
    }

    fn encode_payload(
        &self,
        format: PixelFormat,
        pixels: &[u8],
        width: u32,
        layout: PixelLayout,
        out: &mut Vec<u8>,
    ) -> Result<(), UimgError> {
        if format.is_indexed() {
            if !layout.is_indexed() {
                return Err(UimgError::LayoutMismatch {
                    expected: PixelLayout::Indexed8,
                    actual: layout,
                });
            }
            return pixels::encode_indices(format, pixels, width, out);
        }

        let PixelFormat::FixedChunky {
            bytes_per_chunk,
            bits_per_pixel,
        } = format
        else {
            return Err(UimgError::UnsupportedDepth(format.bits_per_pixel()));
        };

        if layout.is_indexed() {
            let table = self.palette.ok_or(UimgError::LayoutMismatch {
                expected: PixelLayout::Rgb8,
                actual: layout,
            })?;
            let rgb = expand_indices(pixels, table)?;
            fixed::encode_truecolor(&rgb, PixelLayout::Rgb8, bytes_per_chunk, bits_per_pixel, out)
        } else {
            fixed::encode_truecolor(pixels, layout, bytes_per_chunk, bits_per_pixel, out)
        }
    }

    /// Encode a typed RGB or RGBA image. Only truecolor depths accept this.
    #[cfg(feature = "imgref")]
    pub fn encode_imgref<P: crate::DecodePixel>(
        &self,
        img: imgref::ImgRef<'_, P>,
    ) -> Result<Vec<u8>, UimgError>
    where
        [P]: rgb::ComponentBytes<u8>,
    {
        use rgb::ComponentBytes as _;
        let (width, height) = imgref_dimensions(img.width(), img.height())?;
        let layout = P::layout();
        let mut buf = Vec::with_capacity(img.width() * img.height() * layout.bytes_per_pixel());
        for row in img.rows() {
            buf.extend_from_slice(row.as_bytes());
        }
        self.encode(&buf, width, height, layout)
    }
}

/// Container dimensions for an in-memory image, rejecting anything past `u16`.
#[cfg(feature = "imgref")]
fn imgref_dimensions(width: usize, height: usize) -> Result<(u32, u32), UimgError> {
    let too_large = || UimgError::DimensionsTooLarge {
        width: u32::try_from(width).unwrap_or(u32::MAX),
        height: u32::try_from(height).unwrap_or(u32::MAX),
    };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;
    if w > u32::from(u16::MAX) || h > u32::from(u16::MAX) {
        return Err(too_large());
    }
    Ok((w, h))
}

/// Look each index up in `table`, producing packed RGB.
pub(crate) fn expand_indices(indices: &[u8], table: &ColorTable) -> Result<Vec<u8>, UimgError> {
    let mut rgb = Vec::with_capacity(indices.len() * 3);
    for &index in indices {
        let color = table
            .get(usize::from(index))
            .ok_or(UimgError::IndexOutOfRange {
                index: u32::from(index),
                bits_per_pixel: 8,
            })?;
        rgb.extend_from_slice(&color);
    }
    Ok(rgb)
}
