//! Page-organized monochrome surface
//!
//! The panel is 8 pages of 128 columns; each column byte covers 8 pixel rows
//! of its page. Layout code talks to the panel through [`DisplaySurface`] and
//! never sees how the transport encodes addresses.

use thiserror::Error;

/// Number of pages (8-pixel rows) on the panel
pub const PAGES: u8 = 8;

/// Number of columns per page
pub const COLUMNS: usize = 128;

/// Errors raised by a surface
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("column write before any cursor was set")]
    NoCursor,
    #[error("cursor out of range: page {page}, column {column}")]
    InvalidCursor { page: u8, column: u8 },
    #[error("writing {len} bytes at page {page} column {column} crosses the page end")]
    PageOverflow { page: u8, column: usize, len: usize },
    #[error("display bus error: {0}")]
    Bus(String),
}

/// Addressing contract of the display
pub trait DisplaySurface {
    /// Select the page and the column the next write starts at
    fn set_cursor(&mut self, page: u8, column: u8) -> Result<(), SurfaceError>;

    /// Write column bytes starting at the cursor; the cursor advances by
    /// `bytes.len()` and must stay within the current page.
    fn write_columns(&mut self, bytes: &[u8]) -> Result<(), SurfaceError>;
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn set_cursor(&mut self, page: u8, column: u8) -> Result<(), SurfaceError> {
        (**self).set_cursor(page, column)
    }

    fn write_columns(&mut self, bytes: &[u8]) -> Result<(), SurfaceError> {
        (**self).write_columns(bytes)
    }
}

/// Cursor bookkeeping shared by every surface implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: Option<(u8, usize)>,
}

impl Cursor {
    /// Move to `(page, column)`, rejecting addresses outside the panel
    pub fn set(&mut self, page: u8, column: u8) -> Result<(), SurfaceError> {
        if page >= PAGES || column as usize >= COLUMNS {
            return Err(SurfaceError::InvalidCursor { page, column });
        }
        self.position = Some((page, column as usize));
        Ok(())
    }

    /// Reserve `len` columns at the cursor and advance past them.
    ///
    /// Returns the page and start column of the reserved span. The cursor is
    /// left untouched when the span would not fit on the page.
    pub fn advance(&mut self, len: usize) -> Result<(u8, usize), SurfaceError> {
        let (page, column) = self.position.ok_or(SurfaceError::NoCursor)?;
        if column + len > COLUMNS {
            return Err(SurfaceError::PageOverflow { page, column, len });
        }
        self.position = Some((page, column + len));
        Ok((page, column))
    }

    pub fn position(&self) -> Option<(u8, usize)> {
        self.position
    }
}

/// In-memory surface, one byte per column per page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pages: [[u8; COLUMNS]; PAGES as usize],
    cursor: Cursor,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pages: [[0; COLUMNS]; PAGES as usize],
            cursor: Cursor::default(),
        }
    }

    /// Column bytes of one page
    pub fn page(&self, page: u8) -> &[u8; COLUMNS] {
        &self.pages[page as usize]
    }

    /// Whether the pixel at `(x, y)` is lit, `y` counted from the top row
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        (self.pages[y / 8][x] >> (y % 8)) & 1 == 1
    }

    /// True if nothing on `page` is lit
    pub fn page_is_blank(&self, page: u8) -> bool {
        self.pages[page as usize].iter().all(|b| *b == 0)
    }
}

#[cfg(test)]
impl FrameBuffer {
    /// Render the buffer as text, `#` for lit pixels
    fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((COLUMNS + 1) * PAGES as usize * 8);
        for y in 0..(PAGES as usize * 8) {
            for x in 0..COLUMNS {
                out.push(if self.pixel(x, y) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

impl DisplaySurface for FrameBuffer {
    fn set_cursor(&mut self, page: u8, column: u8) -> Result<(), SurfaceError> {
        self.cursor.set(page, column)
    }

    fn write_columns(&mut self, bytes: &[u8]) -> Result<(), SurfaceError> {
        let (page, column) = self.cursor.advance(bytes.len())?;
        self.pages[page as usize][column..column + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}
