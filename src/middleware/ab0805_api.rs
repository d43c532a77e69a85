//! AB0805 middleware: wraps the raw driver and offers a simple API
//! for bring-up, fetching the current time and formatting it.

use crate::drivers::ab0805::{Ab0805, DateTime, Error as RtcError, AB0805_ID0};
use crate::drivers::register_bus::RegisterBus;
use core::fmt::Write as _;
use heapless::String;

pub struct Ab0805Api<'d, BUS> {
    driver: &'d mut Ab0805<BUS>,
    pub present: bool,
    last: DateTime,
}

impl<'d, BUS: RegisterBus> Ab0805Api<'d, BUS> {
    pub fn new(driver: &'d mut Ab0805<BUS>) -> Self {
        Self { driver, present: false, last: DateTime::default() }
    }

    /// Identify the chip, run the bring-up sequence, restart the clock and
    /// take a first reading. `present` reflects the outcome.
    pub fn init(&mut self) -> Result<(), RtcError> {
        match self.bring_up() {
            Ok(dt) => {
                self.last = dt;
                self.present = true;
                info!("AB0805 present, time {}", dt.format().as_str());
                Ok(())
            }
            Err(e) => {
                self.present = false;
                warn!("AB0805 bring-up failed: {:?}", e);
                Err(e)
            }
        }
    }

    pub fn now(&mut self) -> Result<DateTime, RtcError> {
        let dt = self.driver.get_datetime24()?;
        self.last = dt;
        Ok(dt)
    }

    /// Write a new time with the clock halted so no counter rolls over
    /// between the field writes. The clock is restarted even if a write fails.
    pub fn set_datetime(&mut self, dt: &DateTime) -> Result<(), RtcError> {
        self.driver.stop_clock()?;
        let written = self.driver.set_hundredths(0).and_then(|_| self.driver.set_datetime24(dt));
        self.driver.start_clock()?;
        written
    }

    pub fn last(&self) -> &DateTime {
        &self.last
    }

    pub fn format_iso8601(&self) -> String<32> {
        let mut s = String::new();
        let _ = core::write!(s, "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.last.year, self.last.month, self.last.day,
            self.last.hour, self.last.minute, self.last.second);
        s
    }

    fn bring_up(&mut self) -> Result<DateTime, RtcError> {
        let id = self.driver.read_chip_id()?;
        if id != AB0805_ID0 {
            return Err(RtcError::InvalidChipId(id));
        }
        self.driver.initialize()?;
        self.driver.start_clock()?;
        self.driver.get_datetime24()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ab0805::reg;
    use crate::drivers::fake_bus::FakeAb0805;

    fn preset() -> FakeAb0805 {
        let mut fake = FakeAb0805::new();
        // 2025-07-07 18:30:05
        fake.regs[..7].copy_from_slice(&[0x42, 0x05, 0x30, 0x18, 0x07, 0x07, 0x25]);
        fake
    }

    #[test]
    fn init_marks_present_and_restarts_clock() {
        let mut rtc = Ab0805::new(preset());
        let mut api = Ab0805Api::new(&mut rtc);
        api.init().unwrap();
        assert!(api.present);
        assert_eq!(api.last(), &DateTime { year: 2025, month: 7, day: 7, hour: 18, minute: 30, second: 5 });

        let fake = rtc.release();
        assert_eq!(fake.reg(reg::CONTROL1), 0x11);
        assert_eq!(fake.reg(reg::OSC_CONTROL), 0x08);
    }

    #[test]
    fn init_rejects_foreign_chip() {
        let mut fake = preset();
        fake.regs[reg::ID0 as usize] = 0x07;
        let mut rtc = Ab0805::new(fake);
        let mut api = Ab0805Api::new(&mut rtc);
        assert_eq!(api.init(), Err(RtcError::InvalidChipId(0x07)));
        assert!(!api.present);
        // nothing was written to a chip we do not recognise
        assert_eq!(rtc.release().writes, 0);
    }

    #[test]
    fn init_reports_missing_device() {
        let mut fake = preset();
        fake.offline = true;
        let mut rtc = Ab0805::new(fake);
        let mut api = Ab0805Api::new(&mut rtc);
        assert_eq!(api.init(), Err(RtcError::I2cRead));
        assert!(!api.present);
    }

    #[test]
    fn set_then_now() {
        let mut rtc = Ab0805::new(preset());
        let mut api = Ab0805Api::new(&mut rtc);
        api.init().unwrap();

        let dt = DateTime { year: 2024, month: 6, day: 15, hour: 13, minute: 45, second: 30 };
        api.set_datetime(&dt).unwrap();
        assert_eq!(api.now(), Ok(dt));
        assert_eq!(api.last(), &dt);

        let fake = rtc.release();
        assert_eq!(fake.reg(reg::HUNDREDTHS), 0x00);
        assert_eq!(fake.reg(reg::CONTROL1) & 0x80, 0);
    }

    #[test]
    fn iso8601_formatting() {
        let mut rtc = Ab0805::new(preset());
        let mut api = Ab0805Api::new(&mut rtc);
        assert_eq!(api.format_iso8601().as_str(), "0000-00-00T00:00:00Z");
        api.now().unwrap();
        assert_eq!(api.format_iso8601().as_str(), "2025-07-07T18:30:05Z");
    }
}
