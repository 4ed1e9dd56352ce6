use alloc::borrow::Cow;
use alloc::vec::Vec;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::container::ContainerHeader;
use crate::encode::expand_indices;
use crate::error::UimgError;
use crate::limits::Limits;
use crate::palette::{ColorTable, decode_palette};
use crate::pixel::PixelLayout;
use crate::pixels::{self, PixelFormat, check_index};

/// Builder for decoding a UIMG container.
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    palette_bits: Option<u8>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            palette_bits: None,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Precision the palette was written with.
    ///
    /// The container does not record it; without a hint the registers' full
    /// precision is assumed (12 bits for STE/TT, 24 for Falcon).
    pub fn with_palette_bits(mut self, bits: u8) -> Self {
        self.palette_bits = Some(bits);
        self
    }

    pub fn decode(self) -> Result<DecodeOutput<'a>, UimgError> {
        let data = self.data;
        let header = ContainerHeader::parse(data)?;
        let format = header.pixel_format()?;
        let (width, height) = (u32::from(header.width), u32::from(header.height));

        if let Some(limits) = self.limits {
            limits.check(&header)?;
        }

        let mut offset = header.encoded_len();
        let palette = match header.palette {
            Some(variant) => {
                let bits = self
                    .palette_bits
                    .unwrap_or_else(|| variant.native_palette_bits());
                let table = decode_palette(&data[offset..], variant, bits, header.palette_slots())?;
                offset += header.palette_len();
                Some(table)
            }
            None => None,
        };

        let Some(format) = format else {
            return Ok(DecodeOutput::owned(
                Vec::new(),
                0,
                0,
                PixelLayout::Indexed8,
                header,
                palette,
            ));
        };

        let payload = &data[offset..];
        let payload_len = header.payload_len()?;
        if payload.len() < payload_len {
            return Err(UimgError::TruncatedInput {
                needed: offset + payload_len,
                actual: data.len(),
            });
        }
        let layout = format.decoded_layout();
        log::trace!("decoding {payload_len} payload bytes as {format:?}");

        // Single-byte indices are already the decoded representation.
        if let PixelFormat::FixedChunky {
            bytes_per_chunk: 1,
            bits_per_pixel,
        } = format
        {
            if bits_per_pixel <= 8 {
                let indices = &payload[..payload_len];
                for &index in indices {
                    check_index(index, bits_per_pixel)?;
                }
                return Ok(DecodeOutput::borrowed(
                    indices, width, height, layout, header, palette,
                ));
            }
        }

        let pixels = pixels::decode(format, payload, width, height)?;
        Ok(DecodeOutput::owned(
            pixels, width, height, layout, header, palette,
        ))
    }
}

/// Decoded image output. Pixels may be borrowed (zero-copy) or owned.
#[derive(Clone, Debug)]
pub struct DecodeOutput<'a> {
    pixels: Cow<'a, [u8]>,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub header: ContainerHeader,
    palette: Option<ColorTable>,
}

impl<'a> DecodeOutput<'a> {
    /// Access the pixel data. Empty for palette-only containers.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Decoded palette, if the container has one.
    pub fn palette(&self) -> Option<&ColorTable> {
        self.palette.as_ref()
    }

    /// Whether the container carried a pixel payload.
    pub fn has_bitmap(&self) -> bool {
        self.header.has_bitmap()
    }

    /// Take ownership of the pixel data (copies if borrowed).
    pub fn into_owned(self) -> DecodeOutput<'static> {
        DecodeOutput {
            pixels: Cow::Owned(self.pixels.into_owned()),
            width: self.width,
            height: self.height,
            layout: self.layout,
            header: self.header,
            palette: self.palette,
        }
    }

    /// Whether the pixel data is borrowed (zero-copy from input).
    pub fn is_borrowed(&self) -> bool {
        matches!(self.pixels, Cow::Borrowed(_))
    }

    pub(crate) fn borrowed(
        data: &'a [u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
        header: ContainerHeader,
        palette: Option<ColorTable>,
    ) -> Self {
        Self {
            pixels: Cow::Borrowed(data),
            width,
            height,
            layout,
            header,
            palette,
        }
    }

    pub(crate) fn owned(
        data: Vec<u8>,
        width: u32,
        height: u32,
        layout: PixelLayout,
        header: ContainerHeader,
        palette: Option<ColorTable>,
    ) -> Self {
        Self {
            pixels: Cow::Owned(data),
            width,
            height,
            layout,
            header,
            palette,
        }
    }

    /// Convert to packed RGBA8, looking indices up in the palette.
    ///
    /// Fails with [`UimgError::InvalidHeader`] for indexed pixels in a
    /// container without a palette.
    pub fn to_rgba8(&self) -> Result<Vec<u8>, UimgError> {
        if !self.has_bitmap() {
            return Ok(Vec::new());
        }
        let rgb;
        let (src, layout) = match self.layout {
            PixelLayout::Indexed8 => {
                rgb = expand_indices(&self.pixels, self.indexed_palette()?)?;
                (&rgb[..], PixelLayout::Rgb8)
            }
            other => (&self.pixels[..], other),
        };
        match layout {
            PixelLayout::Rgba8 => Ok(src.to_vec()),
            _ => {
                let mut out = Vec::with_capacity(src.len() / 3 * 4);
                for px in src.chunks_exact(3) {
                    out.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
                Ok(out)
            }
        }
    }

    /// Replace palette indices with their RGB colors. Truecolor output is
    /// returned unchanged.
    pub fn into_truecolor(self) -> Result<DecodeOutput<'a>, UimgError> {
        if !self.layout.is_indexed() || !self.has_bitmap() {
            return Ok(self);
        }
        let rgb = expand_indices(&self.pixels, self.indexed_palette()?)?;
        Ok(DecodeOutput {
            pixels: Cow::Owned(rgb),
            layout: PixelLayout::Rgb8,
            ..self
        })
    }

    fn indexed_palette(&self) -> Result<&ColorTable, UimgError> {
        self.palette
            .as_ref()
            .ok_or_else(|| UimgError::InvalidHeader("indexed pixels without a palette".into()))
    }

    /// Reinterpret pixel data as typed pixel slice.
    ///
    /// Returns [`UimgError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], UimgError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if self.layout != P::layout() {
            return Err(UimgError::LayoutMismatch {
                expected: P::layout(),
                actual: self.layout,
            });
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    ///
    /// Returns [`UimgError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(&self) -> Result<imgref::ImgRef<'_, P>, UimgError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    ///
    /// Returns [`UimgError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::DecodePixel>(&self) -> Result<imgref::ImgVec<P>, UimgError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}
