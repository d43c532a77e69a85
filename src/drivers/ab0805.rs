//! AB0805 Real-Time Clock (RTC) I2C driver
//!
//! Abracon AB08X5 family, I2C variant, fixed address 0x69.
//!
//! Goals:
//! - Bring-up: stop clock, unlock and select the crystal oscillator
//! - Read/write every time and date counter (hundredths .. year)
//! - Handle BCD conversions and both 12h and 24h hour encodings
//! - Small blocking API; composites are plain sequences of field accesses
//!
//! Notes:
//! - Each hour accessor reads the 12/24 mode bit right before it touches the
//!   HOURS register, so results never depend on call order.
//! - Out-of-range setter input never reaches the bus. With the default
//!   [`RangePolicy::Ignore`] it is dropped silently, [`RangePolicy::Reject`]
//!   reports [`Error::OutOfRange`].
//! - Composite writes are not atomic: a failure midway leaves the earlier
//!   fields written.
//! - Alarms, interrupts, trickle charger and calibration are not driven.

use super::register_bus::{BusError, RegisterBus};

pub mod bcd;
pub mod datetime;

use bcd::BcdField;
pub use datetime::{to_12h, to_24h, Date, DateTime, DateTime12, HourMode, Meridiem, Time12, Time24};

/// The chip only answers on this address.
pub const AB0805_ADDRESS: u8 = 0x69;
/// Upper byte of the part number, read from ID0.
pub const AB0805_ID0: u8 = 0x08;
pub const AB0805_PART_NUMBER: u16 = 0x0805;

/// Register map
#[allow(dead_code)]
pub mod reg {
    // Time counters (BCD)
    pub const HUNDREDTHS: u8 = 0x00;
    pub const SECONDS: u8 = 0x01;
    pub const MINUTES: u8 = 0x02;
    pub const HOURS: u8 = 0x03;
    pub const DATE: u8 = 0x04;
    pub const MONTH: u8 = 0x05;
    pub const YEAR: u8 = 0x06;
    pub const WEEKDAY: u8 = 0x07;

    // Alarm (not driven)
    pub const HUNDREDTHS_ALARM: u8 = 0x08;
    pub const SECONDS_ALARM: u8 = 0x09;
    pub const MINUTES_ALARM: u8 = 0x0A;
    pub const HOURS_ALARM: u8 = 0x0B;
    pub const DATE_ALARM: u8 = 0x0C;
    pub const MONTH_ALARM: u8 = 0x0D;
    pub const WEEKDAY_ALARM: u8 = 0x0E;

    pub const STATUS: u8 = 0x0F;
    pub const CONTROL1: u8 = 0x10;
    pub const CONTROL2: u8 = 0x11; // interrupt control
    pub const OSC_CONTROL: u8 = 0x1C; // locked, see CONFIG_KEY
    pub const OSC_STATUS: u8 = 0x1D;
    pub const CONFIG_KEY: u8 = 0x1F;
    pub const ID0: u8 = 0x28; // 0x08
    pub const ID1: u8 = 0x29; // 0x05
}

/// Single-bit positions
pub mod bits {
    pub const CONTROL1_STOP: u8 = 7; // 1 freezes the counters
    pub const CONTROL1_12H: u8 = 6; // 0 = 24h, 1 = 12h
    pub const CONTROL1_WRTC: u8 = 0; // must be 1 to write the counters
    pub const OSC_CONTROL_OSC_SEL: u8 = 7; // 0 = crystal, 1 = RC
    pub const HOURS_PM: u8 = 5; // 12h mode only; second tens bit in 24h mode
}

/// Values written to CONFIG_KEY
pub mod key {
    pub const OSC_CONTROL_UNLOCK: u8 = 0xA1;
    pub const SOFTWARE_RESET: u8 = 0x3C;
}

// Bring-up values
const CONTROL1_STOPPED: u8 = 0x91; // STOP | ARST | WRTC
const OSC_CONTROL_XT: u8 = 0x08;

/// Counter layouts (register, tens-digit width)
mod layout {
    use super::bcd::{BcdField, BitField};
    use super::reg;

    pub const HUNDREDTHS: BcdField = BcdField::new(reg::HUNDREDTHS, 4);
    pub const SECONDS: BcdField = BcdField::new(reg::SECONDS, 3);
    pub const MINUTES: BcdField = BcdField::new(reg::MINUTES, 3);
    pub const HOURS_24: BcdField = BcdField::new(reg::HOURS, 2);
    pub const HOURS_12: BcdField = BcdField::new(reg::HOURS, 1);
    pub const DATE: BcdField = BcdField::new(reg::DATE, 2);
    pub const MONTH: BcdField = BcdField::new(reg::MONTH, 1);
    pub const YEAR: BcdField = BcdField::new(reg::YEAR, 4);
    pub const WEEKDAY: BitField = BitField::new(reg::WEEKDAY, 0, 3);
}

const YEAR_EPOCH: u16 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    I2cRead,
    I2cWrite,
    OutOfRange,
    InvalidChipId(u8),
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        match e {
            BusError::Read => Error::I2cRead,
            BusError::Write => Error::I2cWrite,
        }
    }
}

/// What a setter does with a value outside the field's range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangePolicy {
    /// Drop the write and return `Ok(())`.
    #[default]
    Ignore,
    /// Return [`Error::OutOfRange`].
    Reject,
}

pub struct Ab0805<BUS> {
    bus: BUS,
    address: u8,
    policy: RangePolicy,
    last_mode: Option<HourMode>,
}

impl<BUS: RegisterBus> Ab0805<BUS> {
    pub fn new(bus: BUS) -> Self {
        Self::with_address(bus, AB0805_ADDRESS)
    }

    pub fn with_address(bus: BUS, address: u8) -> Self {
        Self { bus, address, policy: RangePolicy::Ignore, last_mode: None }
    }

    pub fn with_policy(mut self, policy: RangePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Give the bus back.
    pub fn release(self) -> BUS {
        self.bus
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Hour mode seen by the most recent mode read or write, if any.
    pub fn last_mode(&self) -> Option<HourMode> {
        self.last_mode
    }

    /// Stop the clock, unlock OSC_CONTROL and select the crystal oscillator.
    /// Writes are not read back.
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.write(reg::CONTROL1, CONTROL1_STOPPED)?;
        self.write(reg::CONFIG_KEY, key::OSC_CONTROL_UNLOCK)?;
        self.write(reg::OSC_CONTROL, OSC_CONTROL_XT)?;
        info!("AB0805: initialized at 0x{:02X} (clock stopped, XT oscillator)", self.address);
        Ok(())
    }

    pub fn read_chip_id(&mut self) -> Result<u8, Error> {
        self.read(reg::ID0)
    }

    /// True iff ID0 reads back as 0x08. A bus failure counts as a mismatch.
    pub fn test_connection(&mut self) -> bool {
        match self.read_chip_id() {
            Ok(AB0805_ID0) => true,
            Ok(id) => {
                warn!("AB0805: unexpected ID0 0x{:02X}", id);
                false
            }
            Err(e) => {
                warn!("AB0805: ID0 read failed: {:?}", e);
                false
            }
        }
    }

    /// ID0:ID1, 0x0805 for this part.
    pub fn part_number(&mut self) -> Result<u16, Error> {
        let hi = self.read(reg::ID0)?;
        let lo = self.read(reg::ID1)?;
        Ok(u16::from(hi) << 8 | u16::from(lo))
    }

    /// Software reset through CONFIG_KEY. CONFIG_KEY itself is not updated.
    pub fn software_reset(&mut self) -> Result<(), Error> {
        debug!("AB0805: software reset");
        self.write(reg::CONFIG_KEY, key::SOFTWARE_RESET)
    }

    pub fn start_clock(&mut self) -> Result<(), Error> {
        self.write_bit(reg::CONTROL1, bits::CONTROL1_STOP, false)
    }

    pub fn stop_clock(&mut self) -> Result<(), Error> {
        self.write_bit(reg::CONTROL1, bits::CONTROL1_STOP, true)
    }

    pub fn is_clock_stopped(&mut self) -> Result<bool, Error> {
        Ok(self.bus.read_bit(self.address, reg::CONTROL1, bits::CONTROL1_STOP)?)
    }

    /// Unlock OSC_CONTROL and switch to the RC oscillator.
    pub fn use_rc_osc(&mut self) -> Result<(), Error> {
        self.write(reg::CONFIG_KEY, key::OSC_CONTROL_UNLOCK)?;
        self.write_bit(reg::OSC_CONTROL, bits::OSC_CONTROL_OSC_SEL, true)?;
        info!("AB0805: switched to RC oscillator");
        Ok(())
    }

    // HUNDREDTHS (only counts with the crystal oscillator)

    pub fn get_hundredths(&mut self) -> Result<u8, Error> {
        self.read_bcd(layout::HUNDREDTHS)
    }

    pub fn set_hundredths(&mut self, hundredths: u8) -> Result<(), Error> {
        if self.accept("hundredths", hundredths.into(), hundredths <= 99)? {
            self.write_bcd(layout::HUNDREDTHS, hundredths)?;
        }
        Ok(())
    }

    // SECONDS

    pub fn get_seconds(&mut self) -> Result<u8, Error> {
        self.read_bcd(layout::SECONDS)
    }

    pub fn set_seconds(&mut self, seconds: u8) -> Result<(), Error> {
        if self.accept("seconds", seconds.into(), seconds <= 59)? {
            self.write_bcd(layout::SECONDS, seconds)?;
        }
        Ok(())
    }

    // MINUTES

    pub fn get_minutes(&mut self) -> Result<u8, Error> {
        self.read_bcd(layout::MINUTES)
    }

    pub fn set_minutes(&mut self, minutes: u8) -> Result<(), Error> {
        if self.accept("minutes", minutes.into(), minutes <= 59)? {
            self.write_bcd(layout::MINUTES, minutes)?;
        }
        Ok(())
    }

    // HOURS

    pub fn get_mode(&mut self) -> Result<HourMode, Error> {
        let twelve = self.bus.read_bit(self.address, reg::CONTROL1, bits::CONTROL1_12H)?;
        let mode = HourMode::from(twelve);
        self.last_mode = Some(mode);
        Ok(mode)
    }

    /// Flip the hour encoding. The HOURS register is not converted.
    pub fn set_mode(&mut self, mode: HourMode) -> Result<(), Error> {
        self.write_bit(reg::CONTROL1, bits::CONTROL1_12H, mode.is_twelve())?;
        self.last_mode = Some(mode);
        Ok(())
    }

    pub fn get_meridiem(&mut self) -> Result<Meridiem, Error> {
        let hours = self.read_hours()?;
        Ok(to_12h(hours).1)
    }

    /// Move the stored hour into the other half of the day, keeping its
    /// 12-hour value.
    pub fn set_meridiem(&mut self, meridiem: Meridiem) -> Result<(), Error> {
        let (hours12, _) = to_12h(self.read_hours()?);
        self.write_hours(to_24h(hours12, meridiem))
    }

    /// 1..=12, converted if the chip counts in 24h mode.
    pub fn get_hours12(&mut self) -> Result<u8, Error> {
        let hours = self.read_hours()?;
        Ok(to_12h(hours).0)
    }

    pub fn set_hours12(&mut self, hours: u8, meridiem: Meridiem) -> Result<(), Error> {
        if self.accept("hours12", hours.into(), (1..=12).contains(&hours))? {
            self.write_hours(to_24h(hours, meridiem))?;
        }
        Ok(())
    }

    /// 0..=23, converted if the chip counts in 12h mode.
    pub fn get_hours24(&mut self) -> Result<u8, Error> {
        self.read_hours()
    }

    pub fn set_hours24(&mut self, hours: u8) -> Result<(), Error> {
        if self.accept("hours24", hours.into(), hours <= 23)? {
            self.write_hours(hours)?;
        }
        Ok(())
    }

    // WEEKDAY

    pub fn get_day_of_week(&mut self) -> Result<u8, Error> {
        let f = layout::WEEKDAY;
        Ok(self.bus.read_bits(self.address, f.reg, f.offset, f.width)?)
    }

    pub fn set_day_of_week(&mut self, dow: u8) -> Result<(), Error> {
        if self.accept("weekday", dow.into(), (1..=7).contains(&dow))? {
            let f = layout::WEEKDAY;
            self.bus.write_bits(self.address, f.reg, f.offset, f.width, dow)?;
        }
        Ok(())
    }

    // DATE

    pub fn get_day(&mut self) -> Result<u8, Error> {
        self.read_bcd(layout::DATE)
    }

    /// 1..=31; not checked against the month length.
    pub fn set_day(&mut self, day: u8) -> Result<(), Error> {
        if self.accept("day", day.into(), (1..=31).contains(&day))? {
            self.write_bcd(layout::DATE, day)?;
        }
        Ok(())
    }

    // MONTH

    pub fn get_month(&mut self) -> Result<u8, Error> {
        self.read_bcd(layout::MONTH)
    }

    pub fn set_month(&mut self, month: u8) -> Result<(), Error> {
        if self.accept("month", month.into(), (1..=12).contains(&month))? {
            self.write_bcd(layout::MONTH, month)?;
        }
        Ok(())
    }

    // YEAR (two digits on top of 2000)

    pub fn get_year(&mut self) -> Result<u16, Error> {
        let years = self.read_bcd(layout::YEAR)?;
        Ok(YEAR_EPOCH + u16::from(years))
    }

    pub fn set_year(&mut self, year: u16) -> Result<(), Error> {
        if self.accept("year", year, (YEAR_EPOCH..=YEAR_EPOCH + 99).contains(&year))? {
            self.write_bcd(layout::YEAR, (year - YEAR_EPOCH) as u8)?;
        }
        Ok(())
    }

    // Composites

    pub fn get_date(&mut self) -> Result<Date, Error> {
        let year = self.get_year()?;
        let month = self.get_month()?;
        let day = self.get_day()?;
        Ok(Date { year, month, day })
    }

    pub fn set_date(&mut self, date: &Date) -> Result<(), Error> {
        self.set_year(date.year)?;
        self.set_month(date.month)?;
        self.set_day(date.day)
    }

    pub fn get_time12(&mut self) -> Result<Time12, Error> {
        let hours = self.get_hours12()?;
        let minutes = self.get_minutes()?;
        let seconds = self.get_seconds()?;
        let meridiem = self.get_meridiem()?;
        Ok(Time12 { hours, minutes, seconds, meridiem })
    }

    pub fn set_time12(&mut self, time: &Time12) -> Result<(), Error> {
        self.set_seconds(time.seconds)?;
        self.set_minutes(time.minutes)?;
        self.set_hours12(time.hours, time.meridiem)
    }

    pub fn get_time24(&mut self) -> Result<Time24, Error> {
        let hours = self.get_hours24()?;
        let minutes = self.get_minutes()?;
        let seconds = self.get_seconds()?;
        Ok(Time24 { hours, minutes, seconds })
    }

    pub fn set_time24(&mut self, time: &Time24) -> Result<(), Error> {
        self.set_seconds(time.seconds)?;
        self.set_minutes(time.minutes)?;
        self.set_hours24(time.hours)
    }

    pub fn get_datetime12(&mut self) -> Result<DateTime12, Error> {
        let time = self.get_time12()?;
        let date = self.get_date()?;
        Ok(DateTime12::new(date, time))
    }

    pub fn set_datetime12(&mut self, dt: &DateTime12) -> Result<(), Error> {
        self.set_time12(&dt.time())?;
        self.set_date(&dt.date())
    }

    pub fn get_datetime24(&mut self) -> Result<DateTime, Error> {
        let time = self.get_time24()?;
        let date = self.get_date()?;
        Ok(DateTime::new(date, time))
    }

    pub fn set_datetime24(&mut self, dt: &DateTime) -> Result<(), Error> {
        self.set_time24(&dt.time())?;
        self.set_date(&dt.date())
    }

    /// Current hour as 0..=23, whatever the chip's encoding.
    fn read_hours(&mut self) -> Result<u8, Error> {
        let mode = self.get_mode()?;
        let raw = self.read(reg::HOURS)?;
        Ok(match mode {
            HourMode::TwentyFour => layout::HOURS_24.decode(raw),
            HourMode::Twelve => {
                let pm = Meridiem::from(raw & (1 << bits::HOURS_PM));
                to_24h(layout::HOURS_12.decode(raw), pm)
            }
        })
    }

    /// Store a 0..=23 hour in the chip's current encoding.
    fn write_hours(&mut self, hours24: u8) -> Result<(), Error> {
        let value = match self.get_mode()? {
            HourMode::TwentyFour => bcd::encode(hours24),
            HourMode::Twelve => {
                let (hours12, meridiem) = to_12h(hours24);
                bcd::encode(hours12) | (u8::from(meridiem) << bits::HOURS_PM)
            }
        };
        self.write(reg::HOURS, value)
    }

    /// Ok(true) if the value may be written.
    fn accept(&self, field: &'static str, value: u16, in_range: bool) -> Result<bool, Error> {
        if in_range {
            return Ok(true);
        }
        match self.policy {
            RangePolicy::Ignore => {
                trace!("AB0805: dropping {} = {}", field, value);
                Ok(false)
            }
            RangePolicy::Reject => {
                warn!("AB0805: {} = {} out of range", field, value);
                Err(Error::OutOfRange)
            }
        }
    }

    fn read_bcd(&mut self, field: BcdField) -> Result<u8, Error> {
        let raw = self.read(field.reg)?;
        Ok(field.decode(raw))
    }

    fn write_bcd(&mut self, field: BcdField, value: u8) -> Result<(), Error> {
        self.write(field.reg, bcd::encode(value))
    }

    fn read(&mut self, reg: u8) -> Result<u8, Error> {
        Ok(self.bus.read_byte(self.address, reg)?)
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        Ok(self.bus.write_byte(self.address, reg, value)?)
    }

    fn write_bit(&mut self, reg: u8, bit: u8, set: bool) -> Result<(), Error> {
        Ok(self.bus.write_bit(self.address, reg, bit, set)?)
    }
}
