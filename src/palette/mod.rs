//! Hardware palette-register encodings.
//!
//! Three register families exist and none of them are compatible:
//!
//! - **STE** ([`Ste`]): 16-bit word, 4 bits per channel with the low bit stored
//!   in each nibble's top position (9-bit ST palettes leave it clear).
//! - **TT** ([`Tt`]): 16-bit word, plain 4-bit nibbles `0x0RGB`.
//! - **Falcon** ([`Falcon`]): 32-bit word laid out as bytes R, G, unused, B,
//!   each channel split into a 6-bit high field and a 2-bit low field.
//!
//! Each register type implements [`PaletteRegister`]; [`PaletteVariant`]
//! selects one at run time.

mod falcon;
mod ste;
mod tt;

pub use falcon::{FALCON_LAYOUT, Falcon};
pub use ste::{STE_LAYOUT, Ste};
pub use tt::{TT_LAYOUT, Tt};

use alloc::vec::Vec;

use crate::error::UimgError;

/// An ordered RGB color table. Index = palette slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorTable {
    entries: Vec<[u8; 3]>,
}

impl ColorTable {
    pub fn new(entries: Vec<[u8; 3]>) -> Self {
        Self { entries }
    }

    /// Build a table from packed `R, G, B` triplets. A trailing partial
    /// triplet is ignored.
    pub fn from_rgb_bytes(bytes: &[u8]) -> Self {
        Self {
            entries: bytes.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
        }
    }

    pub fn entries(&self) -> &[[u8; 3]] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<[u8; 3]> {
        self.entries.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8; 3]> {
        self.entries.iter()
    }
}

impl From<Vec<[u8; 3]>> for ColorTable {
    fn from(entries: Vec<[u8; 3]>) -> Self {
        Self::new(entries)
    }
}

/// Which palette-register family a palette is written for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaletteVariant {
    Ste,
    Tt,
    Falcon,
}

impl PaletteVariant {
    /// Bytes per palette entry in the container.
    pub fn word_bytes(self) -> usize {
        match self {
            Self::Ste => Ste::WORD_BYTES,
            Self::Tt => Tt::WORD_BYTES,
            Self::Falcon => Falcon::WORD_BYTES,
        }
    }

    /// Palette precisions (total bits for R+G+B) these registers accept.
    pub fn supported_bits(self) -> &'static [u8] {
        match self {
            Self::Ste => Ste::SUPPORTED_BITS,
            Self::Tt => Tt::SUPPORTED_BITS,
            Self::Falcon => Falcon::SUPPORTED_BITS,
        }
    }

    /// Full precision of the registers, used when decoding without a hint.
    pub fn native_palette_bits(self) -> u8 {
        match self {
            Self::Ste => Ste::NATIVE_BITS * 3,
            Self::Tt => Tt::NATIVE_BITS * 3,
            Self::Falcon => Falcon::NATIVE_BITS * 3,
        }
    }

    /// Deepest bitmap (and so the largest palette) the registers can serve.
    pub fn max_bits_per_pixel(self) -> u8 {
        match self {
            Self::Ste => 4,
            Self::Tt | Self::Falcon => 8,
        }
    }

    pub fn check_bits(self, bits: u8) -> Result<(), UimgError> {
        if self.supported_bits().contains(&bits) {
            Ok(())
        } else {
            Err(UimgError::InvalidPaletteBits {
                bits,
                variant: self,
            })
        }
    }

    /// Encode one color into a register word.
    pub fn encode_color(self, rgb: [u8; 3], bits: u8) -> Result<u32, UimgError> {
        match self {
            Self::Ste => Ste::encode_color(rgb, bits),
            Self::Tt => Tt::encode_color(rgb, bits),
            Self::Falcon => Falcon::encode_color(rgb, bits),
        }
    }

    /// Decode one register word back to 8-bit RGB.
    pub fn decode_color(self, word: u32, bits: u8) -> Result<[u8; 3], UimgError> {
        match self {
            Self::Ste => Ste::decode_color(word, bits),
            Self::Tt => Tt::decode_color(word, bits),
            Self::Falcon => Falcon::decode_color(word, bits),
        }
    }

    /// Value of the header's palette-kind flag bits.
    pub(crate) fn flag(self) -> u16 {
        match self {
            Self::Ste => 0b01,
            Self::Tt => 0b10,
            Self::Falcon => 0b11,
        }
    }

    pub(crate) fn from_flag(flags: u16) -> Option<Self> {
        match flags & 0b11 {
            0b01 => Some(Self::Ste),
            0b10 => Some(Self::Tt),
            0b11 => Some(Self::Falcon),
            _ => None,
        }
    }
}

/// Palette settings for an encode: which registers, at what precision.
///
/// `bits` is the total precision across R, G and B (9, 12, 18 or 24).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaletteFormat {
    #[default]
    None,
    Ste { bits: u8 },
    Tt { bits: u8 },
    Falcon { bits: u8 },
}

impl PaletteFormat {
    pub fn ste(bits: u8) -> Result<Self, UimgError> {
        PaletteVariant::Ste.check_bits(bits)?;
        Ok(Self::Ste { bits })
    }

    pub fn tt(bits: u8) -> Result<Self, UimgError> {
        PaletteVariant::Tt.check_bits(bits)?;
        Ok(Self::Tt { bits })
    }

    pub fn falcon(bits: u8) -> Result<Self, UimgError> {
        PaletteVariant::Falcon.check_bits(bits)?;
        Ok(Self::Falcon { bits })
    }

    pub fn variant(&self) -> Option<PaletteVariant> {
        match self {
            Self::None => None,
            Self::Ste { .. } => Some(PaletteVariant::Ste),
            Self::Tt { .. } => Some(PaletteVariant::Tt),
            Self::Falcon { .. } => Some(PaletteVariant::Falcon),
        }
    }

    /// Palette precision, 0 when there is no palette.
    pub fn bits(&self) -> u8 {
        match *self {
            Self::None => 0,
            Self::Ste { bits } | Self::Tt { bits } | Self::Falcon { bits } => bits,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub(crate) fn check(&self) -> Result<(), UimgError> {
        match self.variant() {
            Some(variant) => variant.check_bits(self.bits()),
            None => Ok(()),
        }
    }
}

/// Common behaviour of the three register families.
///
/// Implementors describe how per-channel values at the registers' native
/// precision map onto a word; quantization to and from 8-bit RGB is shared.
pub trait PaletteRegister {
    const VARIANT: PaletteVariant;
    /// Bytes per word as stored in the container (big-endian).
    const WORD_BYTES: usize;
    /// Bits per channel the registers hold.
    const NATIVE_BITS: u8;
    const SUPPORTED_BITS: &'static [u8];

    /// Place native-precision `[r, g, b]` into a register word.
    fn pack(native: [u8; 3]) -> u32;

    /// Extract native-precision `[r, g, b]` from a register word.
    fn unpack(word: u32) -> [u8; 3];

    fn encode_color(rgb: [u8; 3], bits: u8) -> Result<u32, UimgError> {
        Self::VARIANT.check_bits(bits)?;
        let channel_bits = bits / 3;
        let shift = Self::NATIVE_BITS - channel_bits;
        Ok(Self::pack(rgb.map(|c| quantize(c, channel_bits) << shift)))
    }

    fn decode_color(word: u32, bits: u8) -> Result<[u8; 3], UimgError> {
        Self::VARIANT.check_bits(bits)?;
        let channel_bits = bits / 3;
        let shift = Self::NATIVE_BITS - channel_bits;
        Ok(Self::unpack(word).map(|v| expand(v >> shift, channel_bits)))
    }
}

/// Round an 8-bit channel to `bits` bits (1..=8), half up.
pub(crate) fn quantize(c: u8, bits: u8) -> u8 {
    let max = (1u32 << bits) - 1;
    ((u32::from(c) * max * 2 + 255) / 510) as u8
}

/// Scale a `bits`-bit channel value back to 8 bits, mapping 0 and max exactly.
pub(crate) fn expand(v: u8, bits: u8) -> u8 {
    let max = (1u32 << bits) - 1;
    ((u32::from(v) * 255 * 2 + max) / (2 * max)) as u8
}

/// Number of palette slots a container with `bits_per_pixel` carries.
pub(crate) fn slot_count(bits_per_pixel: u8) -> usize {
    1usize << bits_per_pixel
}

/// Append `slots` palette words for `table` to `out`. Slots beyond the
/// table's length are written as black.
pub(crate) fn encode_palette(
    table: &ColorTable,
    variant: PaletteVariant,
    bits: u8,
    slots: usize,
    out: &mut Vec<u8>,
) -> Result<(), UimgError> {
    variant.check_bits(bits)?;
    if table.len() > slots {
        return Err(UimgError::PaletteTooLarge {
            entries: table.len(),
            capacity: slots,
        });
    }
    let word_bytes = variant.word_bytes();
    for slot in 0..slots {
        let rgb = table.get(slot).unwrap_or([0, 0, 0]);
        let word = variant.encode_color(rgb, bits)?;
        out.extend_from_slice(&word.to_be_bytes()[4 - word_bytes..]);
    }
    log::trace!(
        "wrote {slots} {variant:?} palette entries ({} bytes)",
        slots * word_bytes
    );
    Ok(())
}

/// Decode `slots` palette words from the start of `data`.
pub(crate) fn decode_palette(
    data: &[u8],
    variant: PaletteVariant,
    bits: u8,
    slots: usize,
) -> Result<ColorTable, UimgError> {
    variant.check_bits(bits)?;
    let word_bytes = variant.word_bytes();
    let needed = slots * word_bytes;
    let bytes = data.get(..needed).ok_or(UimgError::TruncatedInput {
        needed,
        actual: data.len(),
    })?;
    let entries = bytes
        .chunks_exact(word_bytes)
        .map(|chunk| {
            let word = chunk.iter().fold(0u32, |w, &b| (w << 8) | u32::from(b));
            variant.decode_color(word, bits)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ColorTable::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn quantize_expand_endpoints() {
        for bits in 1..=8 {
            let max = ((1u32 << bits) - 1) as u8;
            assert_eq!(quantize(0, bits), 0);
            assert_eq!(quantize(255, bits), max);
            assert_eq!(expand(0, bits), 0);
            assert_eq!(expand(max, bits), 255);
        }
    }

    #[test]
    fn expand_4bit_is_times_17() {
        for v in 0..16u8 {
            assert_eq!(expand(v, 4), v * 17);
        }
    }

    #[test]
    fn quantize_inverts_expand() {
        for bits in 1..=8u8 {
            for v in 0..(1u16 << bits) {
                let v = v as u8;
                assert_eq!(quantize(expand(v, bits), bits), v, "bits={bits} v={v}");
            }
        }
    }

    #[test]
    fn quantize_rounds_half_up() {
        // 128 * 15 / 255 = 7.53
        assert_eq!(quantize(128, 4), 8);
        // 128 * 7 / 255 = 3.51
        assert_eq!(quantize(128, 3), 4);
        assert_eq!(quantize(127, 8), 127);
    }

    #[test]
    fn flag_roundtrip() {
        for v in [PaletteVariant::Ste, PaletteVariant::Tt, PaletteVariant::Falcon] {
            assert_eq!(PaletteVariant::from_flag(v.flag()), Some(v));
        }
        assert_eq!(PaletteVariant::from_flag(0), None);
        assert_eq!(PaletteVariant::from_flag(0xFF00), None);
    }

    #[test]
    fn palette_padded_with_black() {
        let table = ColorTable::new(vec![[255, 255, 255]]);
        let mut out = Vec::new();
        encode_palette(&table, PaletteVariant::Tt, 12, 4, &mut out).unwrap();
        assert_eq!(out, [0x0F, 0xFF, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn palette_too_large_rejected() {
        let table = ColorTable::new(vec![[0, 0, 0]; 3]);
        let mut out = Vec::new();
        let err = encode_palette(&table, PaletteVariant::Falcon, 24, 2, &mut out).unwrap_err();
        assert!(matches!(
            err,
            UimgError::PaletteTooLarge {
                entries: 3,
                capacity: 2
            }
        ));
    }

    #[test]
    fn decode_palette_truncated() {
        let err = decode_palette(&[0u8; 7], PaletteVariant::Falcon, 24, 2).unwrap_err();
        assert!(matches!(
            err,
            UimgError::TruncatedInput {
                needed: 8,
                actual: 7
            }
        ));
    }

    #[test]
    fn palette_format_constructors_validate() {
        assert!(PaletteFormat::ste(12).is_ok());
        assert!(PaletteFormat::tt(9).is_ok());
        assert!(PaletteFormat::falcon(18).is_ok());
        for bad in [0u8, 8, 15, 16, 18, 24] {
            assert!(matches!(
                PaletteFormat::ste(bad),
                Err(UimgError::InvalidPaletteBits { .. })
            ));
        }
        assert!(matches!(
            PaletteFormat::tt(24),
            Err(UimgError::InvalidPaletteBits {
                bits: 24,
                variant: PaletteVariant::Tt
            })
        ));
        assert!(PaletteFormat::falcon(21).is_err());
    }

    #[test]
    fn color_table_from_bytes() {
        let table = ColorTable::from_rgb_bytes(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(table.entries(), &[[1, 2, 3], [4, 5, 6]]);
    }
}
