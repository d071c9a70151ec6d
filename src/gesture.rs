//! Button gesture detection.
//!
//! The button is sampled once per tick. Holding it for a full threshold
//! (1 s, or 2 s with extended wait) counts one click and restarts the
//! count, so holding through N thresholds gives N clicks. Releasing the
//! button ends the gesture:
//!
//! ```text
//!            held (heldTicks++)          release, clicks > 0
//!           ┌────────┐          Idle ─────────────────────► WaitForRelease
//!           └──────► Idle                                          │
//!                     ▲   release, clicks == 0 → Suspend           │ capture clicks
//!                     │                                            ▼
//!                     └──────────────────────────────────── Dispatch { clicks }
//! ```
//!
//! WaitForRelease and Dispatch do not sample the button and consume no
//! tick. Presses shorter than the threshold never count.

use crate::config::{BASE_THRESHOLD_TICKS, EXTENDED_EXTRA_TICKS, MAX_CLICKS};
use crate::power;

/// Number of held ticks needed for one click.
pub const fn click_threshold(extended_wait: bool) -> u16 {
    if extended_wait {
        BASE_THRESHOLD_TICKS + EXTENDED_EXTRA_TICKS
    } else {
        BASE_THRESHOLD_TICKS
    }
}

/// Detector phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Sampling the button, counting held ticks and clicks.
    Idle,
    /// Button released with clicks pending.
    WaitForRelease,
    /// Gesture captured, waiting to be handed to the dispatcher.
    Dispatch { clicks: u8 },
}

/// Outcome of one [`GestureDetector::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Button held, threshold not reached yet.
    Holding,
    /// Threshold reached, click counted. `clicks` is the new total.
    Click { clicks: u8 },
    /// Threshold reached with the count already at the cap.
    Saturated,
    /// Button released with nothing pending; nothing to do until it moves.
    Suspend,
    /// Button released with clicks pending.
    Released,
    /// Click count captured for dispatch.
    Captured,
    /// Completed gesture.
    Gesture { clicks: u8 },
}

impl Step {
    /// Whether the main loop waits a tick before the next poll.
    pub const fn consumes_tick(self) -> bool {
        matches!(self, Step::Holding | Step::Click { .. } | Step::Saturated)
    }
}

/// Gesture state machine. Owns the gesture state exclusively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GestureDetector {
    phase: Phase,
    held_ticks: u16,
    clicks: u8,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureDetector {
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            held_ticks: 0,
            clicks: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn held_ticks(&self) -> u16 {
        self.held_ticks
    }

    pub fn clicks(&self) -> u8 {
        self.clicks
    }

    /// Advance the machine by one step.
    ///
    /// `asserted` is the button level sampled this tick; it is only looked
    /// at in [`Phase::Idle`].
    pub fn poll(&mut self, asserted: bool, extended_wait: bool) -> Step {
        match self.phase {
            Phase::Idle => self.sample(asserted, extended_wait),
            Phase::WaitForRelease => {
                let clicks = self.clicks;
                self.clicks = 0;
                self.held_ticks = 0;
                self.phase = Phase::Dispatch { clicks };
                Step::Captured
            }
            Phase::Dispatch { clicks } => {
                self.phase = Phase::Idle;
                Step::Gesture { clicks }
            }
        }
    }

    fn sample(&mut self, asserted: bool, extended_wait: bool) -> Step {
        if asserted {
            self.held_ticks = self.held_ticks.saturating_add(1);
            if self.held_ticks < click_threshold(extended_wait) {
                return Step::Holding;
            }

            self.held_ticks = 0;
            if self.clicks >= MAX_CLICKS {
                return Step::Saturated;
            }
            self.clicks += 1;
            return Step::Click {
                clicks: self.clicks,
            };
        }

        self.held_ticks = 0;
        if power::should_suspend(asserted, self.clicks) {
            Step::Suspend
        } else {
            self.phase = Phase::WaitForRelease;
            Step::Released
        }
    }
}
