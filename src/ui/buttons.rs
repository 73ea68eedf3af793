//! Button sampling and debouncing.
//!
//! [`ButtonInput::sample`] runs once per tick from the tick handler.
//! Each button keeps a counter of consecutive pressed ticks; any
//! released sample resets it, so contact bounce shorter than
//! [`DEBOUNCE_TICKS`] never produces an event.
//!
//! Two classification policies exist:
//!
//! - [`ButtonPolicy::HoldRepeat`]: click as soon as the press is
//!   debounced, then auto-repeat every [`REPEAT_TICKS`] once held for
//!   [`HOLD_TICKS`]. Nothing happens on release.
//! - [`ButtonPolicy::ReleaseClassify`]: on release, a press of at least
//!   [`LONG_PRESS_TICKS`] is a long press, at least [`DEBOUNCE_TICKS`]
//!   a click.
//!
//! Under both, holding the two buttons together past the debounce
//! threshold reports [`InputEvent::Reset`] once; both buttons then stay
//! silent until each has been released.

use embedded_hal::digital::InputPin;
use heapless::Vec;

use super::{Button, InputEvent, BUTTON_COUNT};
use crate::config::{DEBOUNCE_TICKS, HOLD_TICKS, LONG_PRESS_TICKS, REPEAT_TICKS};

/// Events one sample can produce.
pub type Events = Vec<InputEvent, BUTTON_COUNT>;

/// How debounced presses turn into events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonPolicy {
    /// Click on press, auto-repeat while held.
    HoldRepeat,
    /// Click or long press, decided on release.
    ReleaseClassify,
}

impl ButtonPolicy {
    /// Event for a button still held for `held` ticks.
    fn on_hold(self, button: Button, held: u16) -> Option<InputEvent> {
        match self {
            ButtonPolicy::HoldRepeat => {
                let repeat = held >= HOLD_TICKS && (held - HOLD_TICKS) % REPEAT_TICKS == 0;
                (held == DEBOUNCE_TICKS || repeat).then_some(InputEvent::Click(button))
            }
            ButtonPolicy::ReleaseClassify => None,
        }
    }

    /// Event for a button released after `held` ticks.
    fn on_release(self, button: Button, held: u16) -> Option<InputEvent> {
        match self {
            ButtonPolicy::HoldRepeat => None,
            ButtonPolicy::ReleaseClassify if held >= LONG_PRESS_TICKS => {
                Some(InputEvent::LongPress(button))
            }
            ButtonPolicy::ReleaseClassify if held >= DEBOUNCE_TICKS => {
                Some(InputEvent::Click(button))
            }
            ButtonPolicy::ReleaseClassify => None,
        }
    }
}

/// Per-button press tracking.
pub struct ButtonInput {
    policy: ButtonPolicy,
    /// Consecutive pressed ticks, saturating.
    held: [u16; BUTTON_COUNT],
    /// Set by the reset gesture, cleared on release.
    consumed: [bool; BUTTON_COUNT],
}

impl ButtonInput {
    pub const fn new(policy: ButtonPolicy) -> Self {
        Self {
            policy,
            held: [0; BUTTON_COUNT],
            consumed: [false; BUTTON_COUNT],
        }
    }

    pub fn policy(&self) -> ButtonPolicy {
        self.policy
    }

    /// Ticks the button has been held so far (0 when released).
    pub fn held_ticks(&self, button: Button) -> u16 {
        self.held[button.index()]
    }

    /// Feed one tick's worth of button states (`true` = pressed).
    pub fn sample(&mut self, pressed: [bool; BUTTON_COUNT]) -> Events {
        let mut events = Events::new();

        for (held, &down) in self.held.iter_mut().zip(pressed.iter()) {
            if down {
                *held = held.saturating_add(1);
            }
        }

        let all_debounced = pressed
            .iter()
            .zip(self.held.iter())
            .all(|(&down, &held)| down && held >= DEBOUNCE_TICKS);

        if all_debounced && !self.consumed.iter().all(|&c| c) {
            self.consumed = [true; BUTTON_COUNT];
            debug!("Buttons: reset gesture");
            let _ = events.push(InputEvent::Reset);
            return events;
        }

        for button in Button::ALL {
            let i = button.index();
            let event = if pressed[i] {
                if self.consumed[i] {
                    None
                } else {
                    self.policy.on_hold(button, self.held[i])
                }
            } else {
                let released = (self.held[i] > 0 && !self.consumed[i])
                    .then(|| self.policy.on_release(button, self.held[i]))
                    .flatten();
                self.held[i] = 0;
                self.consumed[i] = false;
                released
            };

            if let Some(event) = event {
                let _ = events.push(event);
            }
        }

        events
    }
}

impl Default for ButtonInput {
    fn default() -> Self {
        Self::new(crate::config::BUTTON_POLICY)
    }
}

/// The two button lines, active-low.
pub struct ButtonPins<P> {
    pins: [P; BUTTON_COUNT],
}

impl<P: InputPin> ButtonPins<P> {
    /// `decrement` is button 0, `increment` button 1.
    pub fn new(decrement: P, increment: P) -> Self {
        Self {
            pins: [decrement, increment],
        }
    }

    /// Current pressed state of both buttons (line low = pressed).
    pub fn read(&mut self) -> Result<[bool; BUTTON_COUNT], P::Error> {
        let [decrement, increment] = &mut self.pins;
        Ok([decrement.is_low()?, increment.is_low()?])
    }
}
