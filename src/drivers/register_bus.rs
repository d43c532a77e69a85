//! Byte and bit level register access keyed by (device address, register).
//!
//! Every `embedded_hal::i2c::I2c` bus gets these primitives through the
//! blanket impl below. Bit operations are read-modify-write over the byte
//! primitives; bit fields are addressed by their least significant bit and a
//! width.

use embedded_hal::i2c::I2c;

/// Failed bus transaction. The underlying HAL error is dropped, drivers only
/// need to know which direction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    Read,
    Write,
}

pub trait RegisterBus {
    fn read_byte(&mut self, address: u8, reg: u8) -> Result<u8, BusError>;

    fn write_byte(&mut self, address: u8, reg: u8, value: u8) -> Result<(), BusError>;

    fn read_bit(&mut self, address: u8, reg: u8, bit: u8) -> Result<bool, BusError> {
        let current = self.read_byte(address, reg)?;
        Ok(current & (1 << bit) != 0)
    }

    fn write_bit(&mut self, address: u8, reg: u8, bit: u8, set: bool) -> Result<(), BusError> {
        let current = self.read_byte(address, reg)?;
        let updated = if set { current | (1 << bit) } else { current & !(1 << bit) };
        self.write_byte(address, reg, updated)
    }

    /// Read `width` bits starting at bit `offset`, right-aligned.
    fn read_bits(&mut self, address: u8, reg: u8, offset: u8, width: u8) -> Result<u8, BusError> {
        let current = self.read_byte(address, reg)?;
        Ok((current >> offset) & field_mask(width))
    }

    /// Replace `width` bits starting at bit `offset`; the other bits are kept.
    fn write_bits(&mut self, address: u8, reg: u8, offset: u8, width: u8, value: u8) -> Result<(), BusError> {
        let mask = field_mask(width) << offset;
        let current = self.read_byte(address, reg)?;
        let updated = (current & !mask) | ((value << offset) & mask);
        self.write_byte(address, reg, updated)
    }
}

impl<I: I2c> RegisterBus for I {
    fn read_byte(&mut self, address: u8, reg: u8) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        self.write_read(address, &[reg], &mut buf).map_err(|_| BusError::Read)?;
        Ok(buf[0])
    }

    fn write_byte(&mut self, address: u8, reg: u8, value: u8) -> Result<(), BusError> {
        self.write(address, &[reg, value]).map_err(|_| BusError::Write)
    }
}

#[inline]
const fn field_mask(width: u8) -> u8 {
    if width >= 8 { 0xFF } else { (1u8 << width) - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const ADDR: u8 = 0x69;

    #[test]
    fn read_byte_uses_write_read() {
        let mut i2c = I2cMock::new(&[I2cTrans::write_read(ADDR, vec![0x28], vec![0x08])]);
        assert_eq!(i2c.read_byte(ADDR, 0x28), Ok(0x08));
        i2c.done();
    }

    #[test]
    fn bus_failures_are_tagged_by_direction() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write_read(ADDR, vec![0x01], vec![0x00]).with_error(ErrorKind::Other),
            I2cTrans::write(ADDR, vec![0x01, 0x30]).with_error(ErrorKind::Other),
        ]);
        assert_eq!(i2c.read_byte(ADDR, 0x01), Err(BusError::Read));
        assert_eq!(i2c.write_byte(ADDR, 0x01, 0x30), Err(BusError::Write));
        i2c.done();
    }

    #[test]
    fn write_bit_is_read_modify_write() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write_read(ADDR, vec![0x10], vec![0x11]),
            I2cTrans::write(ADDR, vec![0x10, 0x91]),
            I2cTrans::write_read(ADDR, vec![0x10], vec![0x91]),
            I2cTrans::write(ADDR, vec![0x10, 0x11]),
        ]);
        i2c.write_bit(ADDR, 0x10, 7, true).unwrap();
        i2c.write_bit(ADDR, 0x10, 7, false).unwrap();
        i2c.done();
    }

    #[test]
    fn read_bit_checks_single_position() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write_read(ADDR, vec![0x10], vec![0x40]),
            I2cTrans::write_read(ADDR, vec![0x10], vec![0xBF]),
        ]);
        assert_eq!(i2c.read_bit(ADDR, 0x10, 6), Ok(true));
        assert_eq!(i2c.read_bit(ADDR, 0x10, 6), Ok(false));
        i2c.done();
    }

    #[test]
    fn bit_fields_keep_neighbouring_bits() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write_read(ADDR, vec![0x07], vec![0xF8]),
            I2cTrans::write(ADDR, vec![0x07, 0xFD]),
            I2cTrans::write_read(ADDR, vec![0x07], vec![0xFD]),
        ]);
        i2c.write_bits(ADDR, 0x07, 0, 3, 5).unwrap();
        assert_eq!(i2c.read_bits(ADDR, 0x07, 0, 3), Ok(5));
        i2c.done();
    }

    #[test]
    fn oversized_bit_field_value_is_masked() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write_read(ADDR, vec![0x11], vec![0x00]),
            I2cTrans::write(ADDR, vec![0x11, 0x30]),
        ]);
        // 0x0F does not fit in two bits at offset 4
        i2c.write_bits(ADDR, 0x11, 4, 2, 0x0F).unwrap();
        i2c.done();
    }

    #[test]
    fn mask_widths() {
        assert_eq!(field_mask(1), 0x01);
        assert_eq!(field_mask(3), 0x07);
        assert_eq!(field_mask(8), 0xFF);
    }
}
