//! STE palette registers (`$FF8240`..`$FF825E`).
//!
//! Each channel nibble stores the 4-bit value rotated right by one: the
//! lowest bit sits in the nibble's top position so that plain ST software,
//! which only knows the lower three bits, still sees a sensible 9-bit color.

use super::{PaletteRegister, PaletteVariant};
use crate::bitlayout::{BitField, BitLayout};

pub const STE_LAYOUT: BitLayout<6> = BitLayout::new(
    16,
    [
        BitField::new("r0", 11, 1),
        BitField::new("r321", 8, 3),
        BitField::new("g0", 7, 1),
        BitField::new("g321", 4, 3),
        BitField::new("b0", 3, 1),
        BitField::new("b321", 0, 3),
    ],
);

/// ST/STE 9- or 12-bit palette word.
#[derive(Clone, Copy, Debug)]
pub struct Ste;

impl PaletteRegister for Ste {
    const VARIANT: PaletteVariant = PaletteVariant::Ste;
    const WORD_BYTES: usize = 2;
    const NATIVE_BITS: u8 = 4;
    const SUPPORTED_BITS: &'static [u8] = &[9, 12];

    fn pack(native: [u8; 3]) -> u32 {
        let [r, g, b] = native.map(u32::from);
        STE_LAYOUT.pack([r & 1, r >> 1, g & 1, g >> 1, b & 1, b >> 1])
    }

    fn unpack(word: u32) -> [u8; 3] {
        let [r0, r321, g0, g321, b0, b321] = STE_LAYOUT.unpack(word);
        [
            ((r321 << 1) | r0) as u8,
            ((g321 << 1) | g0) as u8,
            ((b321 << 1) | b0) as u8,
        ]
    }
}
