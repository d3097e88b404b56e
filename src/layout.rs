//! Screen layout for the clock, date and timer views
//!
//! Every drawing call goes through a [`DisplaySurface`]; nothing here keeps
//! state between frames. The panel has no partial invalidation, so a full
//! redraw always starts with [`clear`].

use thiserror::Error;

use crate::expand::{expand_large, expand_small, ScaledGlyph, LARGE_WIDTH};
use crate::font::{self, Glyph, BREAK_GLYPH, WORK_GLYPH};
use crate::pomodoro::PomodoroSession;
use crate::rtc::DateTime;
use crate::surface::{DisplaySurface, SurfaceError, COLUMNS, PAGES};

/// Width in columns of a small glyph cell
pub const SMALL_WIDTH: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{region} cell at page {page}, column {column} does not fit on the panel")]
    OutOfPanel {
        region: &'static str,
        page: u8,
        column: u8,
    },
}

/// Fixed cell positions of every screen region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// First page of the large `HH:MM:SS` row
    pub time_page: u8,
    /// Columns of `H H : M M : S S`
    pub time_columns: [u8; 8],
    /// First page of the large `DD/MM` row
    pub date_page: u8,
    /// Columns of `D D / M M`
    pub date_columns: [u8; 5],
    /// First page of the large year row
    pub year_page: u8,
    /// Columns of `Y Y Y Y`
    pub year_columns: [u8; 4],
    /// Page of the small timer row
    pub timer_page: u8,
    /// Columns of `M M : S S`
    pub timer_columns: [u8; 5],
    /// Column of the `W`/`B` status glyph
    pub status_column: u8,
    /// Column of the completed-session digit
    pub count_column: u8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            time_page: 1,
            time_columns: [0, 16, 32, 48, 64, 80, 96, 112],
            date_page: 1,
            date_columns: [24, 40, 56, 72, 88],
            year_page: 4,
            year_columns: [32, 48, 64, 80],
            timer_page: 5,
            timer_columns: [32, 40, 48, 56, 64],
            status_column: 80,
            count_column: 88,
        }
    }
}

fn check_large(region: &'static str, page: u8, column: u8) -> Result<(), LayoutError> {
    if page < PAGES - 1 && column as usize + LARGE_WIDTH <= COLUMNS {
        Ok(())
    } else {
        Err(LayoutError::OutOfPanel {
            region,
            page,
            column,
        })
    }
}

fn check_small(region: &'static str, page: u8, column: u8) -> Result<(), LayoutError> {
    if page < PAGES && column as usize + SMALL_WIDTH <= COLUMNS {
        Ok(())
    } else {
        Err(LayoutError::OutOfPanel {
            region,
            page,
            column,
        })
    }
}

impl LayoutConfig {
    /// Check that every cell lies fully inside the panel
    pub fn validate(&self) -> Result<(), LayoutError> {
        for &col in &self.time_columns {
            check_large("time", self.time_page, col)?;
        }
        for &col in &self.date_columns {
            check_large("date", self.date_page, col)?;
        }
        for &col in &self.year_columns {
            check_large("year", self.year_page, col)?;
        }
        for &col in &self.timer_columns {
            check_small("timer", self.timer_page, col)?;
        }
        check_small("status", self.timer_page, self.status_column)?;
        check_small("count", self.timer_page, self.count_column)
    }
}

/// Two decimal digits of `value`, as characters
fn two_digits(value: u16) -> [char; 2] {
    let v = value % 100;
    [digit_char(v / 10), digit_char(v % 10)]
}

fn digit_char(d: u16) -> char {
    char::from(b'0' + (d % 10) as u8)
}

/// Write an 8 column glyph at `(page, column)`
fn draw_glyph<S: DisplaySurface>(
    surface: &mut S,
    page: u8,
    column: u8,
    glyph: &Glyph,
) -> Result<(), SurfaceError> {
    surface.set_cursor(page, column)?;
    surface.write_columns(&expand_small(glyph))
}

/// Draw `symbol` 16x16 on `page` and `page + 1`. Symbols outside the font are skipped.
pub fn draw_large_digit<S: DisplaySurface>(
    surface: &mut S,
    page: u8,
    column: u8,
    symbol: char,
) -> Result<(), SurfaceError> {
    let Some(glyph) = font::lookup(symbol) else {
        log::debug!("No glyph for {:?}, skipped", symbol);
        return Ok(());
    };
    let bottom = page
        .checked_add(1)
        .ok_or(SurfaceError::InvalidCursor { page, column })?;
    let scaled = expand_large(glyph);
    for (row, strip) in [(page, &scaled.top), (bottom, &scaled.bottom)] {
        surface.set_cursor(row, column)?;
        surface.write_columns(&ScaledGlyph::columns(strip))?;
    }
    Ok(())
}

/// Draw `symbol` 8x8 on a single page. Symbols outside the font are skipped.
pub fn draw_small_digit<S: DisplaySurface>(
    surface: &mut S,
    page: u8,
    column: u8,
    symbol: char,
) -> Result<(), SurfaceError> {
    match font::lookup(symbol) {
        Some(glyph) => draw_glyph(surface, page, column, glyph),
        None => {
            log::debug!("No glyph for {:?}, skipped", symbol);
            Ok(())
        }
    }
}

/// Large `HH:MM:SS` starting at `page_base`
pub fn render_time<S: DisplaySurface>(
    surface: &mut S,
    layout: &LayoutConfig,
    page_base: u8,
    time: &DateTime,
) -> Result<(), SurfaceError> {
    let [h1, h2] = two_digits(time.hours.into());
    let [m1, m2] = two_digits(time.minutes.into());
    let [s1, s2] = two_digits(time.seconds.into());
    let symbols = [h1, h2, ':', m1, m2, ':', s1, s2];
    for (column, symbol) in layout.time_columns.iter().zip(symbols) {
        draw_large_digit(surface, page_base, *column, symbol)?;
    }
    Ok(())
}

/// Large `DD/MM` starting at `page_base`, with the year on the row configured
/// as `year_page`, placed the same distance below `page_base` as in the
/// layout.
pub fn render_date<S: DisplaySurface>(
    surface: &mut S,
    layout: &LayoutConfig,
    page_base: u8,
    date: &DateTime,
) -> Result<(), SurfaceError> {
    let [d1, d2] = two_digits(date.day.into());
    let [m1, m2] = two_digits(date.month.into());
    for (column, symbol) in layout.date_columns.iter().zip([d1, d2, '/', m1, m2]) {
        draw_large_digit(surface, page_base, *column, symbol)?;
    }

    let year_page = page_base
        .checked_add(layout.year_page.saturating_sub(layout.date_page))
        .ok_or(SurfaceError::InvalidCursor {
            page: page_base,
            column: layout.year_columns[0],
        })?;
    let [y1, y2] = two_digits(date.year / 100);
    let [y3, y4] = two_digits(date.year % 100);
    for (column, symbol) in layout.year_columns.iter().zip([y1, y2, y3, y4]) {
        draw_large_digit(surface, year_page, *column, symbol)?;
    }
    Ok(())
}

/// Small `MM:SS`, the phase glyph and, below ten, the completed session count
pub fn render_timer<S: DisplaySurface>(
    surface: &mut S,
    layout: &LayoutConfig,
    page_base: u8,
    session: &PomodoroSession,
) -> Result<(), SurfaceError> {
    let (minutes, seconds) = session.remaining();
    let [m1, m2] = two_digits(minutes);
    let [s1, s2] = two_digits(seconds);
    for (column, symbol) in layout.timer_columns.iter().zip([m1, m2, ':', s1, s2]) {
        draw_small_digit(surface, page_base, *column, symbol)?;
    }

    let status = if session.state.is_break() {
        &BREAK_GLYPH
    } else {
        &WORK_GLYPH
    };
    draw_glyph(surface, page_base, layout.status_column, status)?;

    if session.completed_work_sessions < 10 {
        let count = digit_char(session.completed_work_sessions as u16);
        draw_small_digit(surface, page_base, layout.count_column, count)?;
    }
    Ok(())
}

/// Blank every page
pub fn clear<S: DisplaySurface>(surface: &mut S) -> Result<(), SurfaceError> {
    let blank = [0u8; COLUMNS];
    for page in 0..PAGES {
        surface.set_cursor(page, 0)?;
        surface.write_columns(&blank)?;
    }
    Ok(())
}
