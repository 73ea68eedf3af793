//! Unified error type for the scoreboard.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! A missing acknowledgment from the display controller is
//! not an error: the transfer carries on and the event is only logged.

/// Error returned by the segment display driver.
///
/// `E` is the error type of the clock / data lines (`Infallible` on
/// the nRF52840 GPIOs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Driving or reading a clock / data line failed.
    Pin(E),

    /// Digit position outside `0..=3`.
    InvalidPosition(u8),
}

// Convenience conversions

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Pin(e)
    }
}
