//! LED feedback cues.
//!
//! Every cue is a fixed on/off blink repeated a few times. Whether a cue
//! plays depends on the mute setting and, for the reset and startup cues,
//! their own enable flag. A cue that is switched off does nothing at all:
//! no line change and no delay.

use crate::config::*;
use crate::hal::{Board, Clock};
use crate::settings::Settings;

/// On/off blink repeated `repeats` times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub on_ms: u32,
    pub off_ms: u32,
    pub repeats: u8,
}

impl Pattern {
    /// Total running time of the pattern.
    pub const fn duration_ms(&self) -> u32 {
        (self.on_ms + self.off_ms) * self.repeats as u32
    }
}

/// A user-visible confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cue {
    /// One click counted while the button is held.
    Click,
    /// Played while the reset line is asserted.
    Reset,
    /// Played once at boot.
    Startup,
}

impl Cue {
    pub const fn pattern(self) -> Pattern {
        match self {
            Cue::Click => Pattern {
                on_ms: CLICK_BLINK_ON_MS,
                off_ms: CLICK_BLINK_OFF_MS,
                repeats: 1,
            },
            Cue::Reset => Pattern {
                on_ms: RESET_BLINK_ON_MS,
                off_ms: RESET_BLINK_OFF_MS,
                repeats: 1,
            },
            Cue::Startup => Pattern {
                on_ms: STARTUP_BLINK_ON_MS,
                off_ms: STARTUP_BLINK_OFF_MS,
                repeats: STARTUP_BLINK_REPEATS,
            },
        }
    }

    /// Whether the cue plays under the given settings.
    pub fn enabled(self, settings: &Settings) -> bool {
        if settings.mute_enabled {
            return false;
        }
        match self {
            Cue::Click => true,
            Cue::Reset => settings.reset_sound_enabled,
            Cue::Startup => settings.start_sound_enabled,
        }
    }
}

/// Play `pattern` on the feedback line. Leaves the line off.
pub async fn play<B: Board, C: Clock>(board: &mut B, clock: &mut C, pattern: Pattern) {
    for _ in 0..pattern.repeats {
        board.drive_feedback(true);
        clock.sleep_ms(pattern.on_ms).await;
        board.drive_feedback(false);
        clock.sleep_ms(pattern.off_ms).await;
    }
}

/// Play `cue` if the settings allow it. Returns whether it played.
pub async fn emit<B: Board, C: Clock>(
    cue: Cue,
    settings: &Settings,
    board: &mut B,
    clock: &mut C,
) -> bool {
    if !cue.enabled(settings) {
        trace!("Feedback: {} gated off", cue);
        return false;
    }
    play(board, clock, cue.pattern()).await;
    true
}
