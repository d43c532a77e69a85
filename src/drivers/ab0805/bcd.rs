//! Packed BCD codec and register field layouts.
//!
//! The units digit always sits in bits 3:0; the tens digit sits directly
//! above it and its width depends on the field (3 bits for seconds, 1 bit for
//! the month, ...).

/// A BCD counter register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcdField {
    pub reg: u8,
    pub tens_width: u8,
}

impl BcdField {
    pub const fn new(reg: u8, tens_width: u8) -> Self {
        Self { reg, tens_width }
    }

    pub const fn decode(&self, raw: u8) -> u8 {
        decode(raw, self.tens_width)
    }
}

/// A plain binary field inside a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub reg: u8,
    pub offset: u8,
    pub width: u8,
}

impl BitField {
    pub const fn new(reg: u8, offset: u8, width: u8) -> Self {
        Self { reg, offset, width }
    }
}

/// Pack 0..=99 as two BCD digits.
#[inline]
pub const fn encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Unpack a BCD byte, keeping only `tens_width` bits of the tens digit.
#[inline]
pub const fn decode(raw: u8, tens_width: u8) -> u8 {
    let tens = (raw >> 4) & ((1u8 << tens_width) - 1);
    (raw & 0x0F) + tens * 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcd_conversion() {
        assert_eq!(decode(0x23, 2), 23);
        assert_eq!(decode(0x59, 3), 59);
        assert_eq!(decode(0x99, 4), 99);
        assert_eq!(encode(23), 0x23);
        assert_eq!(encode(59), 0x59);
        assert_eq!(encode(0), 0x00);
    }

    #[test]
    fn flag_bits_above_tens_are_ignored() {
        // seconds: bit 7 is not part of the counter
        assert_eq!(decode(0xD9, 3), 59);
        // 12h hours: bit 5 is AM/PM, bit 6 unused
        assert_eq!(decode(0x71, 1), 11);
        // month: bits 7:5 unused
        assert_eq!(decode(0xF2, 1), 12);
    }

    #[test]
    fn field_decode_uses_its_width() {
        let date = BcdField::new(0x04, 2);
        assert_eq!(date.decode(0x31), 31);
        assert_eq!(date.decode(0xC9), 9);
    }
}
