//! Application-wide constants and compile-time configuration.
//!
//! All timing thresholds, score limits and display levels live here so
//! they can be tuned in one place. One tick is one millisecond.

use crate::ui::buttons::ButtonPolicy;

// Scores

/// Score both sides start at, and return to on the reset gesture.
/// A long press of the increment button snaps to this value as well.
pub const MAX_SCORE: u8 = 20;

/// Highest score a side can be clicked up to.
pub const SCORE_CEILING: u8 = 99;

// Run state

/// Ticks without a score-affecting event before the active side times
/// out and the scoreboard returns to idle.
pub const STATE_DURATION_TICKS: u32 = 2000;

/// Blink period of the active side's digits.
pub const BLINK_PERIOD_TICKS: u32 = 500;

/// Portion of [`BLINK_PERIOD_TICKS`] during which the active side is lit.
pub const BLINK_ON_TICKS: u32 = 250;

// Display

/// TM1637 brightness level (0-7) while a side is being edited.
pub const NORMAL_BRIGHTNESS: u8 = 4;

/// TM1637 brightness level (0-7) while idle.
pub const DIM_BRIGHTNESS: u8 = 2;

/// Settle time around the acknowledgment clock (µs).
pub const BIT_DELAY_US: u32 = 50;

// Buttons
//
//   Button "-" (index 0, left side)  → P0.11
//   Button "+" (index 1, right side) → P0.12
//   TM1637 DIO                       → P0.26
//   TM1637 CLK                       → P0.27

/// Minimum continuous press (ticks) that counts as a real press.
pub const DEBOUNCE_TICKS: u16 = 50;

/// Press duration (ticks) after which auto-repeat starts.
pub const HOLD_TICKS: u16 = 500;

/// Auto-repeat interval (ticks) while a button stays held.
pub const REPEAT_TICKS: u16 = 200;

/// Press duration (ticks) classified as a long press on release.
pub const LONG_PRESS_TICKS: u16 = 500;

/// Event classification used by the firmware.
pub const BUTTON_POLICY: ButtonPolicy = ButtonPolicy::HoldRepeat;

/// Depth of the tick → main loop event queue.
pub const EVENT_QUEUE_DEPTH: usize = 4;

// Clock

/// Interval between button samples / clock ticks (ms).
pub const TICK_INTERVAL_MS: u64 = 1;
