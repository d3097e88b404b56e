/// Argument values for the SSD1306 commands in [`super::cmd::Cmd`].
pub struct Flag;
#[allow(missing_docs)]
#[allow(dead_code)]
impl Flag {
    // Memory Addressing Mode (0x20)
    pub const MEMORY_MODE_HORIZONTAL: u8 = 0x00;
    pub const MEMORY_MODE_VERTICAL: u8 = 0x01;
    pub const MEMORY_MODE_PAGE: u8 = 0x02;

    // Display Clock Divide Ratio / Oscillator Frequency (0xD5)
    pub const CLOCK_DIV_DEFAULT: u8 = 0x80; // Divide ratio 1, default oscillator

    // Multiplex Ratio (0xA8)
    pub const MULTIPLEX_64: u8 = 0x3F; // 64 rows

    // Display Offset (0xD3)
    pub const DISPLAY_OFFSET_NONE: u8 = 0x00;

    // Charge Pump Setting (0x8D)
    pub const CHARGE_PUMP_ENABLE: u8 = 0x14;
    pub const CHARGE_PUMP_DISABLE: u8 = 0x10;

    // COM Pins Hardware Configuration (0xDA)
    pub const COM_PINS_ALTERNATIVE: u8 = 0x12; // 128x64 panels

    // Contrast Control (0x81)
    pub const CONTRAST_HIGH: u8 = 0xCF;

    // Pre-charge Period (0xD9)
    pub const PRECHARGE_INTERNAL_VCC: u8 = 0xF1;

    // VCOMH Deselect Level (0xDB)
    pub const VCOMH_DESELECT: u8 = 0x40;
}
