//! Scoreboard controller.
//!
//! Owns both scores and the run state. Button events select a side and
//! adjust its score; a side left untouched for [`STATE_DURATION_TICKS`]
//! drops back to idle. The display frame is derived from this state and
//! the current tick on every render, nothing about it is stored.


use crate::clock::{elapsed, Tick};
use crate::config::{
    BLINK_ON_TICKS, BLINK_PERIOD_TICKS, DIM_BRIGHTNESS, MAX_SCORE, NORMAL_BRIGHTNESS,
    SCORE_CEILING, STATE_DURATION_TICKS,
};
use crate::display::segments::{Frame, BLANK, DIGITS, DOT, MINUS};
use crate::display::SegmentDisplay;
use crate::ui::{Button, InputEvent};

/// Half of the display: positions 0-1 are left, 2-3 right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Side a button selects from idle.
    pub const fn selected_by(button: Button) -> Self {
        match button {
            Button::Decrement => Side::Left,
            Button::Increment => Side::Right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    Idle,
    ActiveLeft,
    ActiveRight,
}

impl RunState {
    pub const fn active(side: Side) -> Self {
        match side {
            Side::Left => RunState::ActiveLeft,
            Side::Right => RunState::ActiveRight,
        }
    }

    pub const fn active_side(self) -> Option<Side> {
        match self {
            RunState::Idle => None,
            RunState::ActiveLeft => Some(Side::Left),
            RunState::ActiveRight => Some(Side::Right),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Brightness {
    /// Idle.
    Dim,
    /// A side is being edited.
    Normal,
}

impl Brightness {
    /// Controller brightness level (0-7).
    pub const fn level(self) -> u8 {
        match self {
            Brightness::Dim => DIM_BRIGHTNESS,
            Brightness::Normal => NORMAL_BRIGHTNESS,
        }
    }
}

/// One side's score, always within 0..=[`SCORE_CEILING`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Score(u8);

impl Score {
    pub const ZERO: Score = Score(0);
    /// Value after power-up and after a reset.
    pub const START: Score = Score(MAX_SCORE);

    /// Clamps `value` to the ceiling.
    pub const fn new(value: u8) -> Self {
        if value > SCORE_CEILING {
            Score(SCORE_CEILING)
        } else {
            Score(value)
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn increment(self) -> Self {
        Score::new(self.0.saturating_add(1))
    }

    pub fn decrement(self) -> Self {
        Score(self.0.saturating_sub(1))
    }
}

impl Default for Score {
    fn default() -> Self {
        Score::START
    }
}

/// Whether an active side's digits are lit at `now`.
pub const fn blink_on(now: Tick) -> bool {
    now % BLINK_PERIOD_TICKS < BLINK_ON_TICKS
}

/// Two segment bytes for one side; the second always carries the dot.
pub const fn side_segments(score: Score, lit: bool) -> [u8; 2] {
    let s = score.value();
    if !lit {
        [BLANK, DOT]
    } else if s == 0 {
        [MINUS, MINUS | DOT]
    } else {
        [DIGITS[(s / 10) as usize], DIGITS[(s % 10) as usize] | DOT]
    }
}

pub struct Scoreboard {
    scores: [Score; 2],
    state: RunState,
    /// Tick of the last event; the timeout runs from here.
    state_time: Tick,
}

impl Scoreboard {
    pub const fn new(now: Tick) -> Self {
        Self {
            scores: [Score::START; 2],
            state: RunState::Idle,
            state_time: now,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn score(&self, side: Side) -> Score {
        self.scores[side.index()]
    }

    pub fn brightness(&self) -> Brightness {
        match self.state {
            RunState::Idle => Brightness::Dim,
            RunState::ActiveLeft | RunState::ActiveRight => Brightness::Normal,
        }
    }

    /// Apply one button event consumed at `now`.
    pub fn handle(&mut self, event: InputEvent, now: Tick) {
        self.state_time = now;

        let (button, long) = match event {
            InputEvent::Reset => {
                self.scores = [Score::START; 2];
                self.state = RunState::Idle;
                info!("Scoreboard: reset");
                return;
            }
            InputEvent::Click(button) => (button, false),
            InputEvent::LongPress(button) => (button, true),
        };

        let Some(side) = self.state.active_side() else {
            let side = Side::selected_by(button);
            self.state = RunState::active(side);
            info!("Scoreboard: {} side active", side);
            return;
        };

        let score = &mut self.scores[side.index()];
        *score = match (button, long) {
            (Button::Decrement, false) => score.decrement(),
            (Button::Increment, false) => score.increment(),
            (Button::Decrement, true) => Score::ZERO,
            (Button::Increment, true) => Score::START,
        };
        debug!("Scoreboard: {} = {}", side, score.value());
    }

    /// Drop back to idle once the active side has been untouched long enough.
    pub fn update(&mut self, now: Tick) {
        if self.state != RunState::Idle && elapsed(now, self.state_time) >= STATE_DURATION_TICKS {
            self.state = RunState::Idle;
            info!("Scoreboard: timeout, idle");
        }
    }

    /// Segment bytes for the whole display at `now`.
    pub fn frame(&self, now: Tick) -> Frame {
        let active = self.state.active_side();
        let mut frame = [BLANK; 4];

        for (side, half) in Side::ALL.iter().zip(frame.chunks_exact_mut(2)) {
            let lit = active != Some(*side) || blink_on(now);
            half.copy_from_slice(&side_segments(self.score(*side), lit));
        }

        frame
    }

    /// Push brightness and the current frame to the display.
    pub fn render<D: SegmentDisplay>(&self, display: &mut D, now: Tick) -> Result<(), D::Error> {
        display.set_brightness(self.brightness().level());
        display.display_raw(&self.frame(now))
    }
}
