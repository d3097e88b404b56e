//! Pixel doubling for the large clock digits
//!
//! A large glyph is 16x16 pixels built from an 8x8 source: the low nibble of
//! every column byte becomes the upper page, the high nibble the lower page,
//! and each source pixel turns into a 2x2 block.

use crate::font::Glyph;

/// Width in columns of an expanded glyph
pub const LARGE_WIDTH: usize = 16;

/// A glyph scaled to two page strips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledGlyph {
    /// Source rows 0-3, drawn on the first page
    pub top: [u8; 8],
    /// Source rows 4-7, drawn on the page below
    pub bottom: [u8; 8],
}

impl ScaledGlyph {
    /// Column bytes for one strip with every byte repeated, giving the
    /// horizontal half of the doubling.
    pub fn columns(strip: &[u8; 8]) -> [u8; LARGE_WIDTH] {
        let mut out = [0u8; LARGE_WIDTH];
        for (i, byte) in strip.iter().enumerate() {
            out[2 * i] = *byte;
            out[2 * i + 1] = *byte;
        }
        out
    }
}

/// Spread the four bits of `nibble` so bit `b` lands on bits `2b` and `2b + 1`
fn double_bits(nibble: u8) -> u8 {
    let mut byte = 0u8;
    for b in 0..4 {
        if nibble & (1 << b) != 0 {
            byte |= 0b11 << (b * 2);
        }
    }
    byte
}

/// Expand an 8x8 glyph into the two strips of a 16x16 glyph
pub fn expand_large(glyph: &Glyph) -> ScaledGlyph {
    let mut top = [0u8; 8];
    let mut bottom = [0u8; 8];
    for (i, column) in glyph.iter().enumerate() {
        top[i] = double_bits(column & 0x0F);
        bottom[i] = double_bits(column >> 4);
    }
    ScaledGlyph { top, bottom }
}

/// Small glyphs are drawn as-is
pub fn expand_small(glyph: &Glyph) -> Glyph {
    *glyph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{lookup, BREAK_GLYPH, WORK_GLYPH};

    /// Take every other bit of a doubled byte back to a nibble
    fn halve_bits(byte: u8) -> u8 {
        (0..4).fold(0, |acc, b| acc | (((byte >> (2 * b)) & 1) << b))
    }

    fn collapse(scaled: &ScaledGlyph) -> Glyph {
        let mut glyph = [0u8; 8];
        for i in 0..8 {
            glyph[i] = halve_bits(scaled.top[i]) | (halve_bits(scaled.bottom[i]) << 4);
        }
        glyph
    }

    #[test]
    fn test_double_bits_mapping() {
        assert_eq!(double_bits(0b0000), 0b0000_0000);
        assert_eq!(double_bits(0b0001), 0b0000_0011);
        assert_eq!(double_bits(0b0010), 0b0000_1100);
        assert_eq!(double_bits(0b0100), 0b0011_0000);
        assert_eq!(double_bits(0b1000), 0b1100_0000);
        assert_eq!(double_bits(0b1111), 0xFF);
        assert_eq!(double_bits(0b1010), 0b1100_1100);
    }

    #[test]
    fn test_nibbles_feed_their_strip() {
        let glyph = [0x0F, 0xF0, 0x81, 0x00, 0x00, 0x00, 0x00, 0x00];
        let scaled = expand_large(&glyph);
        assert_eq!(scaled.top[0], 0xFF);
        assert_eq!(scaled.bottom[0], 0x00);
        assert_eq!(scaled.top[1], 0x00);
        assert_eq!(scaled.bottom[1], 0xFF);
        assert_eq!(scaled.top[2], 0x03);
        assert_eq!(scaled.bottom[2], 0xC0);
    }

    #[test]
    fn test_collapse_restores_every_glyph() {
        let mut glyphs: Vec<Glyph> = "0123456789:/-".chars().filter_map(lookup).copied().collect();
        glyphs.push(WORK_GLYPH);
        glyphs.push(BREAK_GLYPH);
        for glyph in glyphs {
            assert_eq!(collapse(&expand_large(&glyph)), glyph);
        }
    }

    #[test]
    fn test_columns_repeat_pairs() {
        let strip = [1, 2, 3, 4, 5, 6, 7, 8];
        let cols = ScaledGlyph::columns(&strip);
        assert_eq!(cols, [1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8]);
    }

    #[test]
    fn test_one_digit_expansion() {
        // "1": columns 0x00 0x42 0x7F 0x40
        let scaled = expand_large(lookup('1').unwrap());
        assert_eq!(scaled.top[..4], [0x00, 0x0C, 0xFF, 0x00]);
        assert_eq!(scaled.bottom[..4], [0x00, 0x30, 0x3F, 0x30]);
    }

    #[test]
    fn test_small_is_identity() {
        let glyph = *lookup('8').unwrap();
        assert_eq!(expand_small(&glyph), glyph);
    }
}
