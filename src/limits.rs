use crate::container::ContainerHeader;
use crate::error::UimgError;

/// Resource limits applied to a parsed header before anything is decoded.
///
/// All fields default to `None` (no limit). Header dimensions are 16-bit, so
/// an unchecked 32 bpp container can still ask for 16 GiB of RGBA output.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u16>,
    pub max_height: Option<u16>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes allocated for decoded pixels plus the decoded palette.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Limits that admit any Atari screen mode, up to 1280x960.
    pub fn screen() -> Self {
        Self {
            max_width: Some(1280),
            max_height: Some(960),
            max_pixels: Some(1280 * 960),
            max_memory_bytes: None,
        }
    }

    /// Check a parsed header against these limits.
    pub(crate) fn check(&self, header: &ContainerHeader) -> Result<(), UimgError> {
        let format = header.pixel_format()?;
        let (width, height) = (header.width, header.height);
        if format.is_some() {
            if let Some(max_w) = self.max_width.filter(|&max| width > max) {
                return Err(UimgError::LimitExceeded(alloc::format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
            if let Some(max_h) = self.max_height.filter(|&max| height > max) {
                return Err(UimgError::LimitExceeded(alloc::format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }

        let pixels = format.map_or(0, |_| u64::from(width) * u64::from(height));
        if let Some(max_px) = self.max_pixels.filter(|&max| pixels > max) {
            return Err(UimgError::LimitExceeded(alloc::format!(
                "pixel count {pixels} exceeds limit {max_px}"
            )));
        }

        let entries = header.palette_slots() as u64;
        let pixel_bytes =
            format.map_or(0, |f| pixels * f.decoded_layout().bytes_per_pixel() as u64);
        let bytes = pixel_bytes + entries * 3;
        if let Some(max_mem) = self.max_memory_bytes.filter(|&max| bytes > max) {
            return Err(UimgError::LimitExceeded(alloc::format!(
                "decoding needs {bytes} bytes, memory limit is {max_mem}"
            )));
        }
        Ok(())
    }
}
