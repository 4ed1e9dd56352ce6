//! Portable bit-field descriptions for hardware register words.
//!
//! A [`BitLayout`] lists named fields by bit offset (from the LSB) and width.
//! [`BitLayout::pack`] and [`BitLayout::unpack`] move values in and out of a
//! `u32` word in field order, so register formats never depend on how a
//! compiler would lay out a bit-field struct.

/// One named field inside a register word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitField {
    pub name: &'static str,
    /// Position of the field's least significant bit.
    pub offset: u8,
    /// Width in bits (1..=32).
    pub width: u8,
}

impl BitField {
    pub const fn new(name: &'static str, offset: u8, width: u8) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    /// Mask of the field's value bits, not shifted into position.
    pub const fn mask(&self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    /// Place `value` into this field. Bits above the field width are dropped.
    pub const fn insert(&self, word: u32, value: u32) -> u32 {
        let mask = self.mask();
        (word & !(mask << self.offset)) | ((value & mask) << self.offset)
    }

    /// Read this field's value out of `word`.
    pub const fn extract(&self, word: u32) -> u32 {
        (word >> self.offset) & self.mask()
    }
}

/// An ordered set of `N` fields making up a register word of `word_bits` bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitLayout<const N: usize> {
    pub word_bits: u8,
    pub fields: [BitField; N],
}

impl<const N: usize> BitLayout<N> {
    pub const fn new(word_bits: u8, fields: [BitField; N]) -> Self {
        Self { word_bits, fields }
    }

    /// Pack one value per field (in field order) into a word.
    pub fn pack(&self, values: [u32; N]) -> u32 {
        self.fields
            .iter()
            .zip(values)
            .fold(0, |word, (field, value)| field.insert(word, value))
    }

    /// Unpack a word into one value per field (in field order).
    pub fn unpack(&self, word: u32) -> [u32; N] {
        let mut values = [0u32; N];
        for (value, field) in values.iter_mut().zip(&self.fields) {
            *value = field.extract(word);
        }
        values
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&BitField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Read a single named field out of `word`.
    pub fn get(&self, word: u32, name: &str) -> Option<u32> {
        self.field(name).map(|f| f.extract(word))
    }

    /// Whether no two fields overlap and all fit inside the word.
    pub fn is_disjoint(&self) -> bool {
        let mut used = 0u64;
        for field in &self.fields {
            if u32::from(field.offset) + u32::from(field.width) > u32::from(self.word_bits) {
                return false;
            }
            let bits = u64::from(field.mask()) << field.offset;
            if used & bits != 0 {
                return false;
            }
            used |= bits;
        }
        true
    }
}
