//! 8x8 glyphs for the clock and timer digits
//!
//! Each glyph is eight column bytes in panel order: byte `i` is column `i`
//! of the cell and bit `n` of that byte lights pixel row `n` (row 0 at the
//! top of the page). Glyphs are five columns wide and leave the last three
//! columns blank as spacing.

/// One 8x8 monochrome glyph
pub type Glyph = [u8; 8];

/// Symbols the clock font can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Digit(u8),
    Colon,
    Slash,
    Dash,
}

impl Symbol {
    /// Map a character onto the font alphabet
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0'..='9' => Some(Symbol::Digit(ch as u8 - b'0')),
            ':' => Some(Symbol::Colon),
            '/' => Some(Symbol::Slash),
            '-' => Some(Symbol::Dash),
            _ => None,
        }
    }

    /// Bitmap for this symbol
    pub fn glyph(self) -> Option<&'static Glyph> {
        match self {
            Symbol::Digit(d) => DIGITS.get(d as usize),
            Symbol::Colon => Some(&COLON),
            Symbol::Slash => Some(&SLASH),
            Symbol::Dash => Some(&DASH),
        }
    }
}

const DIGITS: [Glyph; 10] = [
    [0x3E, 0x51, 0x49, 0x45, 0x3E, 0x00, 0x00, 0x00], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00, 0x00, 0x00, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46, 0x00, 0x00, 0x00], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31, 0x00, 0x00, 0x00], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10, 0x00, 0x00, 0x00], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39, 0x00, 0x00, 0x00], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30, 0x00, 0x00, 0x00], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03, 0x00, 0x00, 0x00], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36, 0x00, 0x00, 0x00], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E, 0x00, 0x00, 0x00], // 9
];

const COLON: Glyph = [0x00, 0x36, 0x36, 0x00, 0x00, 0x00, 0x00, 0x00];
const SLASH: Glyph = [0x20, 0x10, 0x08, 0x04, 0x02, 0x00, 0x00, 0x00];
const DASH: Glyph = [0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x00, 0x00];

/// Status glyph shown next to the timer while working
pub const WORK_GLYPH: Glyph = [0x3F, 0x40, 0x38, 0x40, 0x3F, 0x00, 0x00, 0x00];

/// Status glyph shown next to the timer during short and long breaks
pub const BREAK_GLYPH: Glyph = [0x7F, 0x49, 0x49, 0x49, 0x36, 0x00, 0x00, 0x00];

/// Look up the glyph for `ch`.
///
/// Returns `None` for characters outside `0-9 : / -`; callers draw nothing
/// for those.
pub fn lookup(ch: char) -> Option<&'static Glyph> {
    Symbol::from_char(ch).and_then(Symbol::glyph)
}

/// Glyph for a single decimal digit, `None` when `value > 9`
pub fn digit(value: u8) -> Option<&'static Glyph> {
    Symbol::Digit(value).glyph()
}
