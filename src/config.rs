//! Hardware map and runtime configuration
//!
//! Pin numbers are fixed by the board. WiFi credentials and the optional
//! provisioning timestamp are baked in at build time from the environment.

use crate::layout::{LayoutConfig, LayoutError};
use crate::pomodoro::PomodoroConfig;

/// GPIO assignments of the ESP32-C3 desk board
pub struct Pins;

#[allow(dead_code)]
impl Pins {
    // I2C bus shared with the RTC
    /// I2C clock
    pub const I2C_SCL: u8 = 7;
    /// I2C data
    pub const I2C_SDA: u8 = 6;

    // SPI OLED
    /// Data/Command control pin (High for data, Low for command)
    pub const OLED_DC: u8 = 4;
    /// Chip select
    pub const OLED_CS: u8 = 5;
    /// SPI Master Out Slave In
    pub const OLED_MOSI: u8 = 2;
    /// SPI clock
    pub const OLED_SCLK: u8 = 3;
    /// Reset, active low
    pub const OLED_RST: u8 = 10;

    // Inputs, all active low with pull-ups
    /// Start/stop button
    pub const BTN_START_STOP: u8 = 0;
    /// Reset button
    pub const BTN_RESET: u8 = 1;
    /// Capacitive touch pad output
    pub const TOUCH: u8 = 9;

    /// Piezo buzzer, driven by LEDC
    pub const BUZZER: u8 = 18;
}

/// SSID of the access point to join, empty when not configured
pub const WIFI_SSID: &str = match option_env!("POMODESK_WIFI_SSID") {
    Some(ssid) => ssid,
    None => "",
};

/// WPA2 passphrase for [`WIFI_SSID`]
pub const WIFI_PASS: &str = match option_env!("POMODESK_WIFI_PASS") {
    Some(pass) => pass,
    None => "",
};

/// `YYYY-MM-DDTHH:MM:SS` written to the RTC at boot when set
pub const SET_TIME: Option<&str> = option_env!("POMODESK_SET_TIME");

/// Task cadences and input tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Render and tick period
    pub frame_interval_ms: u32,
    /// Frames shown per view before switching between clock and date
    pub view_period: u32,
    /// Touch counter poll period
    pub touch_poll_ms: u32,
    /// Button settle window and touch debounce
    pub debounce_ms: u32,
    /// Number of values the touch mode cycles through
    pub touch_modes: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 1000,
            view_period: 5,
            touch_poll_ms: 10,
            debounce_ms: 50,
            touch_modes: 2,
        }
    }
}

/// Everything the desk needs at boot
#[derive(Debug, Clone, Default)]
pub struct DeskConfig {
    pub pomodoro: PomodoroConfig,
    pub layout: LayoutConfig,
    pub schedule: ScheduleConfig,
}

impl DeskConfig {
    /// Check the layout against the panel
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.layout.validate()
    }

    /// Whether WiFi credentials were provided at build time
    pub fn has_wifi() -> bool {
        !WIFI_SSID.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let schedule = ScheduleConfig::default();
        assert_eq!(schedule.frame_interval_ms, 1000);
        assert_eq!(schedule.view_period, 5);
        assert_eq!(schedule.touch_poll_ms, 10);
        assert_eq!(schedule.debounce_ms, 50);
        assert_eq!(schedule.touch_modes, 2);
    }

    #[test]
    fn test_default_desk_is_valid() {
        let config = DeskConfig::default();
        config.validate().unwrap();
        assert_eq!(config.pomodoro.work(), 1500);
    }
}
