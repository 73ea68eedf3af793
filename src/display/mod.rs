//! 4-digit 7-segment display subsystem.
//!
//! ## Components
//!
//! - **Segments**: digit table, glyph constants, number layout
//! - **TM1637**: bit-banged two-wire driver for the display controller

pub mod segments;
pub mod tm1637;

use segments::{Frame, BLANK, DIGIT_COUNT};

/// Operations the scoreboard needs from a segment display.
pub trait SegmentDisplay {
    type Error;

    /// Brightness level for subsequent updates (0-7, clamped).
    fn set_brightness(&mut self, level: u8);

    /// Turn the display on or off with the next update.
    fn set_enabled(&mut self, on: bool);

    /// Send all four positions, left to right.
    fn display_raw(&mut self, frame: &Frame) -> Result<(), Self::Error>;

    /// Update a single position (0-3) without resending the others.
    fn display_at(&mut self, position: u8, segments: u8) -> Result<(), Self::Error>;

    /// Show a number in -999..=9999; see [`segments::number_frame`].
    fn display_number(&mut self, value: i16, leading_zero: bool) -> Result<(), Self::Error> {
        self.display_raw(&segments::number_frame(value, leading_zero))
    }

    /// Blank all positions.
    fn clear(&mut self) -> Result<(), Self::Error> {
        self.display_raw(&[BLANK; DIGIT_COUNT])
    }
}
