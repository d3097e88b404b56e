//! Real-time clock
//!
//! The render loop only needs [`Clock::get_time`]; setting the time happens
//! once at provisioning. [`Ds3231`] is the I2C chip on the board.

use embedded_hal::i2c::I2c;
use serde::Serialize;
use thiserror::Error;

/// DS3231 I2C address
pub const DS3231_ADDR: u8 = 0x68;

/// First timekeeping register (seconds)
const REG_SECONDS: u8 = 0x00;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RtcError {
    #[error("I2C transfer with the RTC failed: {0}")]
    Bus(String),
    #[error("invalid date/time {0}")]
    Invalid(String),
}

/// Wall clock time as read from the RTC, 24 hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateTime {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl DateTime {
    /// Check every field against its calendar range
    pub fn validate(self) -> Result<Self, RtcError> {
        let max_day = days_in_month(self.month, self.year);
        let valid = self.seconds < 60
            && self.minutes < 60
            && self.hours < 24
            && (1..=12).contains(&self.month)
            && (1..=max_day).contains(&self.day)
            && (2000..=2099).contains(&self.year);
        if valid {
            Ok(self)
        } else {
            Err(RtcError::Invalid(format!("{}", self)))
        }
    }

    /// Parse `YYYY-MM-DDTHH:MM:SS` (a space also separates date and time)
    pub fn parse_iso(text: &str) -> Result<Self, RtcError> {
        let invalid = || RtcError::Invalid(text.to_string());
        let text = text.trim();
        let (date, time) = text.split_once(['T', ' ']).ok_or_else(invalid)?;

        let mut date_parts = date.split('-');
        let mut time_parts = time.split(':');
        let next = |parts: &mut std::str::Split<'_, char>| -> Result<u16, RtcError> {
            parts
                .next()
                .and_then(|p| p.parse::<u16>().ok())
                .ok_or_else(invalid)
        };

        let year = next(&mut date_parts)?;
        let month = next(&mut date_parts)?;
        let day = next(&mut date_parts)?;
        let hours = next(&mut time_parts)?;
        let minutes = next(&mut time_parts)?;
        let seconds = next(&mut time_parts)?;
        if date_parts.next().is_some() || time_parts.next().is_some() {
            return Err(invalid());
        }

        let narrow = |v: u16| u8::try_from(v).map_err(|_| invalid());
        DateTime {
            seconds: narrow(seconds)?,
            minutes: narrow(minutes)?,
            hours: narrow(hours)?,
            day: narrow(day)?,
            month: narrow(month)?,
            year,
        }
        .validate()
    }

    /// `HH:MM:SS`
    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }

    /// `DD/MM/YYYY`
    pub fn date_label(&self) -> String {
        format!("{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hours, self.minutes, self.seconds
        )
    }
}

fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Source of wall clock time
pub trait Clock {
    fn get_time(&mut self) -> Result<DateTime, RtcError>;
    fn set_time(&mut self, time: &DateTime) -> Result<(), RtcError>;
}

fn bcd_to_dec(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

fn dec_to_bcd(dec: u8) -> u8 {
    ((dec / 10) << 4) | (dec % 10)
}

/// DS3231 over I2C
pub struct Ds3231<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Clock for Ds3231<I2C> {
    fn get_time(&mut self) -> Result<DateTime, RtcError> {
        let mut data = [0u8; 7];
        self.i2c
            .write_read(DS3231_ADDR, &[REG_SECONDS], &mut data)
            .map_err(|e| RtcError::Bus(format!("{:?}", e)))?;

        // data[3] is the day of week, which the clock does not show
        DateTime {
            seconds: bcd_to_dec(data[0] & 0x7F),
            minutes: bcd_to_dec(data[1] & 0x7F),
            hours: bcd_to_dec(data[2] & 0x3F),
            day: bcd_to_dec(data[4] & 0x3F),
            month: bcd_to_dec(data[5] & 0x1F),
            year: 2000 + bcd_to_dec(data[6]) as u16,
        }
        .validate()
    }

    fn set_time(&mut self, time: &DateTime) -> Result<(), RtcError> {
        let time = time.validate()?;
        let buf = [
            REG_SECONDS,
            dec_to_bcd(time.seconds),
            dec_to_bcd(time.minutes),
            dec_to_bcd(time.hours),
            dec_to_bcd(1), // day of week, unused
            dec_to_bcd(time.day),
            dec_to_bcd(time.month),
            dec_to_bcd((time.year - 2000) as u8),
        ];
        self.i2c
            .write(DS3231_ADDR, &buf)
            .map_err(|e| RtcError::Bus(format!("{:?}", e)))?;
        log::info!("RTC set to: {}", time);
        Ok(())
    }
}
