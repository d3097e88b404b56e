//! Display interface using SPI
use crate::ssd1306::{cmd::Cmd, flag::Flag};
use display_interface::DisplayError;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

const RESET_DELAY_MS: u32 = 10;
const POWER_UP_DELAY_MS: u32 = 100;

/// The connection interface of the SSD1306 in 4-wire SPI mode
pub struct DisplayInterface<SPI, DC, RST> {
    /// SPI device, chip select is handled by the device
    spi: SPI,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting, active low
    rst: RST,
}

impl<SPI, DC, RST> DisplayInterface<SPI, DC, RST> {
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        DisplayInterface { spi, dc, rst }
    }

    /// Give back the bus and pins
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }
}

impl<SPI, DC, RST> DisplayInterface<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Hardware reset followed by the power-up command sequence
    pub(crate) fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        log::info!("Initializing SSD1306 OLED");

        self.reset(delay)?;
        delay.delay_ms(POWER_UP_DELAY_MS);

        self.cmd(Cmd::DISPLAY_OFF)?;
        self.cmd_with_arg(Cmd::SET_CLOCK_DIV, Flag::CLOCK_DIV_DEFAULT)?;
        self.cmd_with_arg(Cmd::SET_MULTIPLEX, Flag::MULTIPLEX_64)?;
        self.cmd_with_arg(Cmd::SET_DISPLAY_OFFSET, Flag::DISPLAY_OFFSET_NONE)?;
        self.cmd(Cmd::SET_START_LINE)?;
        self.cmd_with_arg(Cmd::CHARGE_PUMP, Flag::CHARGE_PUMP_ENABLE)?;
        // Page addressing: the column pointer stops at the end of a page
        self.cmd_with_arg(Cmd::MEMORY_MODE, Flag::MEMORY_MODE_PAGE)?;
        self.cmd(Cmd::SEGMENT_REMAP)?;
        self.cmd(Cmd::COM_SCAN_DEC)?;
        self.cmd_with_arg(Cmd::SET_COM_PINS, Flag::COM_PINS_ALTERNATIVE)?;
        self.cmd_with_arg(Cmd::SET_CONTRAST, Flag::CONTRAST_HIGH)?;
        self.cmd_with_arg(Cmd::SET_PRECHARGE, Flag::PRECHARGE_INTERNAL_VCC)?;
        self.cmd_with_arg(Cmd::SET_VCOM_DETECT, Flag::VCOMH_DESELECT)?;
        self.cmd(Cmd::DISPLAY_ALL_ON_RESUME)?;
        self.cmd(Cmd::NORMAL_DISPLAY)?;
        self.cmd(Cmd::DEACTIVATE_SCROLL)?;
        self.cmd(Cmd::DISPLAY_ON)?;

        delay.delay_ms(POWER_UP_DELAY_MS);
        log::info!("SSD1306 initialized");
        Ok(())
    }

    /// Pulse the reset line low
    pub(crate) fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(RESET_DELAY_MS);
        log::debug!("OLED reset complete");
        Ok(())
    }

    /// Basic function for sending commands
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        match self.spi.write(&[command]) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// A command followed by its one-byte argument, both sent in command mode
    pub(crate) fn cmd_with_arg(&mut self, command: u8, arg: u8) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.cmd(arg)
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(data)
            .map_err(|_| DisplayError::BusWriteError)
    }
}
