//! Input-changed handlers, one plain `fn` per filter kind.

use super::{FilterState, TimerAction, Transition};

// ═══════════════════════════════════════════════════════════════════════════
//  Countdown (off-delay)
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn countdown_input(state: &FilterState, duration_secs: u32, input: bool) -> Transition {
    if input {
        Transition {
            output: true,
            timer: TimerAction::Cancel,
        }
    } else {
        // Output holds until the timer drops it.
        Transition {
            output: state.output,
            timer: TimerAction::StartOneShot(duration_secs),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Leading edge detector
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn edge_detector_input(state: &FilterState, duration_secs: u32, input: bool) -> Transition {
    if !input {
        return Transition::hold(state);
    }
    let timer = if state.timer_active {
        // Pulse in progress: not extended.
        TimerAction::None
    } else {
        TimerAction::StartOneShot(duration_secs)
    };
    Transition {
        output: true,
        timer,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Flip-flop
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn flip_flop_input(state: &FilterState, input: bool) -> Transition {
    if input && !state.last_input {
        Transition {
            output: !state.output,
            timer: TimerAction::None,
        }
    } else {
        Transition::hold(state)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Square wave
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn square_wave_input(_state: &FilterState, duration_secs: u32, input: bool) -> Transition {
    if input {
        Transition {
            output: true,
            timer: TimerAction::StartRepeating(duration_secs),
        }
    } else {
        Transition {
            output: false,
            timer: TimerAction::Cancel,
        }
    }
}
