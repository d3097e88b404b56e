//! Desk clock with a pomodoro timer on a 128x64 SSD1306 OLED
//!
//! Everything except the ESP-IDF glue builds and tests on the host.

pub mod buzzer;
pub mod config;
pub mod expand;
pub mod font;
pub mod input;
pub mod layout;
pub mod pomodoro;
pub mod rtc;
pub mod scheduler;
pub mod ssd1306;
pub mod status;
pub mod surface;
pub mod web;

#[cfg(target_os = "espidf")]
pub mod wifi;

pub use crate::config::{DeskConfig, Pins, ScheduleConfig};
pub use crate::input::{Command, CommandSender, CommandSource, InputArbiter, InputCommand};
pub use crate::layout::LayoutConfig;
pub use crate::pomodoro::{PomodoroConfig, PomodoroEngine, PomodoroSession, PomodoroState};
pub use crate::rtc::{Clock, DateTime, Ds3231};
pub use crate::scheduler::{FrameReport, RenderScheduler, View};
pub use crate::ssd1306::Ssd1306;
pub use crate::status::{DeskState, StatusSnapshot};
pub use crate::surface::{DisplaySurface, FrameBuffer, SurfaceError};
