//! Driver for the SSD1306 in page addressing mode

use display_interface::DisplayError;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::ssd1306::{cmd::Cmd, interface::DisplayInterface};
use crate::surface::{Cursor, DisplaySurface, SurfaceError, COLUMNS, PAGES};

impl From<DisplayError> for SurfaceError {
    fn from(e: DisplayError) -> Self {
        SurfaceError::Bus(format!("{:?}", e))
    }
}

/// SSD1306 OLED driven column by column, without a frame buffer
pub struct Ssd1306<SPI, DC, RST> {
    interface: DisplayInterface<SPI, DC, RST>,
    cursor: Cursor,
}

impl<SPI, DC, RST> Ssd1306<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create the driver, then reset and initialize the panel
    pub fn new(
        spi: SPI,
        dc: DC,
        rst: RST,
        delay: &mut impl DelayNs,
    ) -> Result<Self, DisplayError> {
        let mut interface = DisplayInterface::new(spi, dc, rst);
        interface.init(delay)?;
        Ok(Self {
            interface,
            cursor: Cursor::default(),
        })
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.interface.cmd_with_arg(Cmd::SET_CONTRAST, contrast)
    }

    /// Turn display on/off
    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        if on {
            self.interface.cmd(Cmd::DISPLAY_ON)
        } else {
            self.interface.cmd(Cmd::DISPLAY_OFF)
        }
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError> {
        if inverted {
            self.interface.cmd(Cmd::INVERT_DISPLAY)
        } else {
            self.interface.cmd(Cmd::NORMAL_DISPLAY)
        }
    }

    /// Light every even page and blank every odd one, to check the wiring
    pub fn fill_test_pattern(&mut self) -> Result<(), SurfaceError> {
        log::info!("Drawing test pattern...");
        let lit = [0xFF; COLUMNS];
        let blank = [0x00; COLUMNS];
        for page in 0..PAGES {
            self.set_cursor(page, 0)?;
            self.write_columns(if page % 2 == 0 { &lit } else { &blank })?;
        }
        Ok(())
    }

    /// Give back the bus and pins
    pub fn release(self) -> (SPI, DC, RST) {
        self.interface.release()
    }
}

impl<SPI, DC, RST> DisplaySurface for Ssd1306<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    fn set_cursor(&mut self, page: u8, column: u8) -> Result<(), SurfaceError> {
        self.cursor.set(page, column)?;
        self.interface.cmd(Cmd::SET_PAGE_START | page)?;
        self.interface.cmd(Cmd::SET_LOW_COLUMN | (column & 0x0F))?;
        self.interface.cmd(Cmd::SET_HIGH_COLUMN | (column >> 4))?;
        Ok(())
    }

    fn write_columns(&mut self, bytes: &[u8]) -> Result<(), SurfaceError> {
        self.cursor.advance(bytes.len())?;
        self.interface.data(bytes)?;
        Ok(())
    }
}
