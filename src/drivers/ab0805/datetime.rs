//! Time and date values exchanged with the AB0805, plus 12/24-hour conversion.

use core::fmt::Write;
use heapless::String as HeaplessString;

/// Hour encoding selected by CONTROL1 bit 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourMode {
    TwentyFour,
    Twelve,
}

impl From<bool> for HourMode {
    fn from(twelve: bool) -> Self {
        if twelve { HourMode::Twelve } else { HourMode::TwentyFour }
    }
}

impl HourMode {
    pub fn is_twelve(self) -> bool {
        self == HourMode::Twelve
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Meridiem {
    Am,
    Pm,
}

impl From<bool> for Meridiem {
    fn from(pm: bool) -> Self {
        if pm { Meridiem::Pm } else { Meridiem::Am }
    }
}

/// Any non-zero value means PM.
impl From<u8> for Meridiem {
    fn from(v: u8) -> Self {
        Meridiem::from(v != 0)
    }
}

impl From<Meridiem> for u8 {
    fn from(m: Meridiem) -> Self {
        match m {
            Meridiem::Am => 0,
            Meridiem::Pm => 1,
        }
    }
}

/// 0..=23 to (1..=12, AM/PM). Midnight is 12 AM, noon is 12 PM.
pub fn to_12h(hours24: u8) -> (u8, Meridiem) {
    let meridiem = Meridiem::from(hours24 >= 12);
    let hours = match hours24 {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    (hours, meridiem)
}

/// (1..=12, AM/PM) to 0..=23.
pub fn to_24h(hours12: u8, meridiem: Meridiem) -> u8 {
    match (hours12, meridiem) {
        (12, Meridiem::Am) => 0,
        (h, Meridiem::Pm) if h < 12 => h + 12,
        (h, _) => h,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    pub year: u16, // 2000-2099
    pub month: u8, // 1-12
    pub day: u8,   // 1-31
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time24 {
    pub hours: u8, // 0-23
    pub minutes: u8,
    pub seconds: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time12 {
    pub hours: u8, // 1-12
    pub minutes: u8,
    pub seconds: u8,
    pub meridiem: Meridiem,
}

/// Calendar date and 24-hour time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    pub fn new(date: Date, time: Time24) -> Self {
        Self {
            year: date.year,
            month: date.month,
            day: date.day,
            hour: time.hours,
            minute: time.minutes,
            second: time.seconds,
        }
    }

    pub fn date(&self) -> Date {
        Date { year: self.year, month: self.month, day: self.day }
    }

    pub fn time(&self) -> Time24 {
        Time24 { hours: self.hour, minutes: self.minute, seconds: self.second }
    }

    /// `MM/DD/YYYY HH:MM:SS`
    pub fn format(&self) -> HeaplessString<32> {
        let mut output = HeaplessString::new();
        let _ = write!(output, "{:02}/{:02}/{:04} {:02}:{:02}:{:02}",
            self.month, self.day, self.year, self.hour, self.minute, self.second);
        output
    }
}

/// Calendar date and 12-hour time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime12 {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8, // 1-12
    pub minute: u8,
    pub second: u8,
    pub meridiem: Meridiem,
}

impl DateTime12 {
    pub fn new(date: Date, time: Time12) -> Self {
        Self {
            year: date.year,
            month: date.month,
            day: date.day,
            hour: time.hours,
            minute: time.minutes,
            second: time.seconds,
            meridiem: time.meridiem,
        }
    }

    pub fn date(&self) -> Date {
        Date { year: self.year, month: self.month, day: self.day }
    }

    pub fn time(&self) -> Time12 {
        Time12 { hours: self.hour, minutes: self.minute, seconds: self.second, meridiem: self.meridiem }
    }
}

impl From<DateTime12> for DateTime {
    fn from(dt: DateTime12) -> Self {
        let (hours, minutes, seconds) = (to_24h(dt.hour, dt.meridiem), dt.minute, dt.second);
        DateTime::new(dt.date(), Time24 { hours, minutes, seconds })
    }
}

impl From<DateTime> for DateTime12 {
    fn from(dt: DateTime) -> Self {
        let (hours, meridiem) = to_12h(dt.hour);
        DateTime12::new(dt.date(), Time12 { hours, minutes: dt.minute, seconds: dt.second, meridiem })
    }
}
