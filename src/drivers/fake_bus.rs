//! In-memory AB0805 register file for host tests.
//!
//! Behaves like the chip's I2C front end: the first written byte sets the
//! register pointer, further bytes are stored with auto-increment, reads
//! continue from the pointer.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use super::ab0805::{reg, AB0805_ADDRESS};

pub struct FakeAb0805 {
    pub regs: [u8; 0x40],
    /// Register writes seen so far (one per stored byte).
    pub writes: usize,
    pub offline: bool,
    pointer: usize,
}

impl FakeAb0805 {
    pub fn new() -> Self {
        let mut regs = [0u8; 0x40];
        regs[reg::ID0 as usize] = 0x08;
        regs[reg::ID1 as usize] = 0x05;
        Self { regs, writes: 0, offline: false, pointer: 0 }
    }

    pub fn twelve_hour() -> Self {
        let mut fake = Self::new();
        fake.regs[reg::CONTROL1 as usize] |= 1 << 6;
        fake
    }

    pub fn reg(&self, r: u8) -> u8 {
        self.regs[r as usize]
    }
}

impl ErrorType for FakeAb0805 {
    type Error = ErrorKind;
}

impl I2c for FakeAb0805 {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        if self.offline || address != AB0805_ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        let len = self.regs.len();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    if let Some((first, data)) = bytes.split_first() {
                        self.pointer = *first as usize;
                        for b in data {
                            self.regs[self.pointer % len] = *b;
                            self.pointer += 1;
                            self.writes += 1;
                        }
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.regs[self.pointer % len];
                        self.pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}
