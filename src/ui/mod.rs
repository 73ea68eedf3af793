//! User input subsystem - the two score buttons.
//!
//! The tick handler samples both lines once per millisecond and turns
//! the raw levels into [`InputEvent`]s for the scoreboard.
//!
//! ## Components
//!
//! - **Buttons**: 2 tactile switches, active-low with pull-ups ("-" and "+")

pub mod buttons;

/// Number of physical buttons.
pub const BUTTON_COUNT: usize = 2;

/// Physical buttons.
///
/// The decrement button also selects the left side from idle, the
/// increment button the right side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// "-" button (index 0).
    Decrement,
    /// "+" button (index 1).
    Increment,
}

impl Button {
    pub const ALL: [Button; BUTTON_COUNT] = [Button::Decrement, Button::Increment];

    pub const fn index(self) -> usize {
        match self {
            Button::Decrement => 0,
            Button::Increment => 1,
        }
    }
}

/// Button events (after debouncing).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Short press, or one auto-repeat step while held.
    Click(Button),
    /// Press held past the long-press threshold, reported on release.
    LongPress(Button),
    /// Both buttons held together.
    Reset,
}
