//! Falcon VIDEL palette registers (`$FF9800`..`$FF9BFC`).
//!
//! One long word per entry, bytes `R G 00 B`. The VIDEL itself only reads the
//! top six bits of each byte; the low two are kept so 24-bit palettes survive
//! a round trip.

use super::{PaletteRegister, PaletteVariant};
use crate::bitlayout::{BitField, BitLayout};

pub const FALCON_LAYOUT: BitLayout<6> = BitLayout::new(
    32,
    [
        BitField::new("r765432", 26, 6),
        BitField::new("r10", 24, 2),
        BitField::new("g765432", 18, 6),
        BitField::new("g10", 16, 2),
        BitField::new("b765432", 2, 6),
        BitField::new("b10", 0, 2),
    ],
);

/// Falcon 9-, 12-, 18- or 24-bit palette word.
#[derive(Clone, Copy, Debug)]
pub struct Falcon;

impl PaletteRegister for Falcon {
    const VARIANT: PaletteVariant = PaletteVariant::Falcon;
    const WORD_BYTES: usize = 4;
    const NATIVE_BITS: u8 = 8;
    const SUPPORTED_BITS: &'static [u8] = &[9, 12, 18, 24];

    fn pack(native: [u8; 3]) -> u32 {
        let [r, g, b] = native.map(u32::from);
        FALCON_LAYOUT.pack([r >> 2, r & 3, g >> 2, g & 3, b >> 2, b & 3])
    }

    fn unpack(word: u32) -> [u8; 3] {
        let [r_hi, r_lo, g_hi, g_lo, b_hi, b_lo] = FALCON_LAYOUT.unpack(word);
        [
            ((r_hi << 2) | r_lo) as u8,
            ((g_hi << 2) | g_lo) as u8,
            ((b_hi << 2) | b_lo) as u8,
        ]
    }
}
