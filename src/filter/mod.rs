//! Filter behaviours as pure transition functions.
//!
//! Every filter is an input-driven Mealy machine over a shared
//! [`FilterState`].  There are exactly two triggers:
//!
//! ```text
//! ┌──────────────┬──────────────────────────┬──────────────────┐
//! │ FilterKind   │ on_input_changed         │ on_timer_fired   │
//! ├──────────────┼──────────────────────────┼──────────────────┤
//! │ Countdown    │ ↑ out=1, cancel          │ out=0            │
//! │              │ ↓ start one-shot         │                  │
//! │ EdgeDetector │ ↑ out=1, one-shot if idle│ out=0            │
//! │ FlipFlop     │ ↑ out=!out               │ (no timer)       │
//! │ SquareWave   │ ↑ out=1, start repeating │ out=!out         │
//! │              │ ↓ out=0, cancel          │                  │
//! └──────────────┴──────────────────────────┴──────────────────┘
//! ```
//!
//! The functions here never touch a timer or emit anything: they return a
//! [`Transition`] and the owning device carries it out.

pub mod variants;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four supported filter behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    /// Off-delay: output follows input up, drops `time` seconds after input drops.
    #[serde(rename = "countdown")]
    Countdown,
    /// Fixed-length pulse on a rising edge, not extended by later edges.
    #[serde(rename = "edge detector")]
    EdgeDetector,
    /// Toggles the output on every rising edge.
    #[serde(rename = "flip-flop")]
    FlipFlop,
    /// Oscillates with half-period `time` while the input is high.
    #[serde(rename = "square wave")]
    SquareWave,
}

impl FilterKind {
    pub const ALL: [Self; 4] = [
        Self::Countdown,
        Self::EdgeDetector,
        Self::FlipFlop,
        Self::SquareWave,
    ];

    /// Configuration label (the `type` field).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Countdown => "countdown",
            Self::EdgeDetector => "edge detector",
            Self::FlipFlop => "flip-flop",
            Self::SquareWave => "square wave",
        }
    }

    /// Human-readable description shown by the hosting runtime.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Countdown => "Countdown Timer",
            Self::EdgeDetector => "Leading Edge Detector",
            Self::FlipFlop => "Flip-Flop",
            Self::SquareWave => "Square Wave Generator",
        }
    }

    /// Whether this behaviour arms a repeating timer.
    pub const fn is_periodic(self) -> bool {
        matches!(self, Self::SquareWave)
    }

    /// A zero period is only meaningful for one-shot behaviours.
    pub const fn accepts_duration(self, secs: u32) -> bool {
        !(self.is_periodic() && secs == 0)
    }

    /// Decide the reaction to an input level change.
    ///
    /// Must only be called when `input` differs from `state.last_input`.
    pub fn on_input_changed(self, state: &FilterState, duration_secs: u32, input: bool) -> Transition {
        match self {
            Self::Countdown => variants::countdown_input(state, duration_secs, input),
            Self::EdgeDetector => variants::edge_detector_input(state, duration_secs, input),
            Self::FlipFlop => variants::flip_flop_input(state, input),
            Self::SquareWave => variants::square_wave_input(state, duration_secs, input),
        }
    }

    /// Decide the new output when the device's timer fires.
    pub fn on_timer_fired(self, state: &FilterState) -> bool {
        match self {
            Self::Countdown | Self::EdgeDetector => false,
            Self::FlipFlop => state.output,
            Self::SquareWave => !state.output,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|k| k.label() == s).ok_or(())
    }
}

/// Mutable per-device filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub output: bool,
    pub timer_active: bool,
    /// Last input level seen.  Drives flip-flop edge detection and the
    /// device's duplicate suppression.
    pub last_input: bool,
}

/// What the owning device should do with its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    None,
    StartOneShot(u32),
    StartRepeating(u32),
    Cancel,
}

/// Result of one input-changed decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub output: bool,
    pub timer: TimerAction,
}

impl Transition {
    pub const fn hold(state: &FilterState) -> Self {
        Self {
            output: state.output,
            timer: TimerAction::None,
        }
    }
}
