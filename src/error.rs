use alloc::string::String;

use crate::palette::PaletteVariant;

/// Errors from UIMG encoding and decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UimgError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("palette has {entries} entries, container holds {capacity}")]
    PaletteTooLarge { entries: usize, capacity: usize },

    #[error("not a UIMG container (bad magic)")]
    BadMagic,

    #[error("unsupported bits per pixel: {0}")]
    UnsupportedDepth(u8),

    #[error("unsupported bytes per chunk: {0}")]
    UnsupportedChunkSize(i8),

    #[error("{bits}-bit palette not supported by the {variant:?} registers")]
    InvalidPaletteBits { bits: u8, variant: PaletteVariant },

    #[error("width {width} is not a multiple of 16")]
    DimensionNotAligned { width: u32 },

    #[error("{pixel_count} pixels do not fill whole {group}-pixel groups")]
    PixelCountNotAligned { pixel_count: usize, group: usize },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: crate::PixelLayout,
        actual: crate::PixelLayout,
    },

    #[error("palette index {index} does not fit in {bits_per_pixel} bits")]
    IndexOutOfRange { index: u32, bits_per_pixel: u8 },

    #[error("truncated input: need {needed} bytes, got {actual}")]
    TruncatedInput { needed: usize, actual: usize },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}

/// Coarse grouping of [`UimgError`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Illegal combination of depth, chunk size and palette settings.
    Configuration,
    /// The container or the requested format cannot be represented.
    Format,
    /// Pixel or palette data does not fit the declared format.
    Data,
    /// A caller-supplied [`crate::Limits`] was exceeded.
    Limit,
}

impl UimgError {
    /// Which class of failure this is.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig(_) | Self::PaletteTooLarge { .. } => ErrorCategory::Configuration,
            Self::BadMagic
            | Self::UnsupportedDepth(_)
            | Self::UnsupportedChunkSize(_)
            | Self::InvalidPaletteBits { .. }
            | Self::DimensionNotAligned { .. }
            | Self::PixelCountNotAligned { .. }
            | Self::InvalidHeader(_)
            | Self::LayoutMismatch { .. } => ErrorCategory::Format,
            Self::IndexOutOfRange { .. }
            | Self::TruncatedInput { .. }
            | Self::BufferTooSmall { .. }
            | Self::DimensionsTooLarge { .. } => ErrorCategory::Data,
            Self::LimitExceeded(_) => ErrorCategory::Limit,
        }
    }
}
