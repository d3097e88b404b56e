//! SSD1306 OLED Display Driver
//!
//! Used with the 0.96" 128x64 SPI module wired as in [`crate::config::Pins`].
//!
//! The controller runs in page addressing mode: a page (8 pixel rows) and a
//! start column are selected, then column bytes are streamed and the column
//! pointer advances on its own. This maps directly onto
//! [`DisplaySurface`](crate::surface::DisplaySurface), which
//! [`driver::Ssd1306`] implements.
//!
//! ### Usage
//! 1. create the driver with [`driver::Ssd1306::new`], which resets and
//!    initializes the panel
//! 1. draw through the [`crate::layout`] functions
//!
#![allow(clippy::cast_possible_truncation)]

pub mod driver;
pub mod interface;

mod cmd;
mod flag;

pub use driver::Ssd1306;
