pub struct Cmd;
#[allow(dead_code)]
impl Cmd {
    // Fundamental
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const DISPLAY_ALL_ON: u8 = 0xA5;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const INVERT_DISPLAY: u8 = 0xA7;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;

    // Scrolling
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;

    // Addressing, page addressing mode
    pub const MEMORY_MODE: u8 = 0x20;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_START: u8 = 0xB0;

    // Hardware configuration
    pub const SET_START_LINE: u8 = 0x40;
    pub const SEGMENT_REMAP: u8 = 0xA1;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;

    // Timing and driving
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const CHARGE_PUMP: u8 = 0x8D;
}
