//! TT palette registers (`$FF8400`..`$FF85FE`): plain `0x0RGB` nibbles.

use super::{PaletteRegister, PaletteVariant};
use crate::bitlayout::{BitField, BitLayout};

pub const TT_LAYOUT: BitLayout<3> = BitLayout::new(
    16,
    [
        BitField::new("r3210", 8, 4),
        BitField::new("g3210", 4, 4),
        BitField::new("b3210", 0, 4),
    ],
);

/// TT 9- or 12-bit palette word.
#[derive(Clone, Copy, Debug)]
pub struct Tt;

impl PaletteRegister for Tt {
    const VARIANT: PaletteVariant = PaletteVariant::Tt;
    const WORD_BYTES: usize = 2;
    const NATIVE_BITS: u8 = 4;
    const SUPPORTED_BITS: &'static [u8] = &[9, 12];

    fn pack(native: [u8; 3]) -> u32 {
        TT_LAYOUT.pack(native.map(u32::from))
    }

    fn unpack(word: u32) -> [u8; 3] {
        TT_LAYOUT.unpack(word).map(|v| v as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_bit_fields() {
        let word = Tt::encode_color([255, 0, 128], 12).unwrap();
        assert_eq!(TT_LAYOUT.get(word, "r3210"), Some(0xF));
        assert_eq!(TT_LAYOUT.get(word, "g3210"), Some(0x0));
        assert_eq!(TT_LAYOUT.get(word, "b3210"), Some(0x8));
        assert_eq!(word, 0x0F08);
    }

    #[test]
    fn nine_bit_shifted_into_nibble() {
        // 3-bit 7 and 4 shifted left by one
        let word = Tt::encode_color([255, 0, 128], 9).unwrap();
        assert_eq!(word, 0x0E08);
    }

    #[test]
    fn decode_uses_endpoint_exact_scaling() {
        assert_eq!(Tt::decode_color(0x0F08, 12).unwrap(), [255, 0, 136]);
        assert_eq!(Tt::decode_color(0x0E08, 9).unwrap(), [255, 0, 146]);
    }

    #[test]
    fn rejects_18_bit() {
        assert!(Tt::encode_color([1, 2, 3], 18).is_err());
    }
}
