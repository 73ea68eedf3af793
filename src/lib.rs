//! Two-player scoreboard: two buttons and a TM1637 4-digit display.
//!
//! Each side of the display shows one player's score. Pressing a button
//! selects a side (the "-" button the left, "+" the right), after which
//! the buttons adjust that side's score while its digits blink. After
//! two seconds without input the board dims and returns to idle. Holding
//! both buttons resets both scores.
//!
//! The library holds all logic that does not touch hardware directly so
//! it can be tested on the host:
//!
//! - [`clock`]: tick counter and wrapping durations
//! - [`ui`]: button debouncing and event classification
//! - [`scoreboard`]: controller state and frame rendering
//! - [`display`]: segment encoding and the TM1637 bus driver
//!
//! Usage: `cargo test`
//!
//! The firmware binary (`src/main.rs`, feature `embedded`) wires these to
//! the nRF52840 pins and the Embassy executors.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod scoreboard;
pub mod ui;

pub use error::Error;
