//! Power management - suspend between gestures.
//!
//! With the button released and no clicks pending there is nothing to time,
//! so the controller stops ticking and waits for the next button edge. On
//! nRF52840 the wait is a GPIOTE port event; the executor idles the core in
//! WFE until it fires.
//!
//! States:
//! - Active: ticking, sampling the button every 100 ms
//! - Suspended: no timers running, woken only by a button edge

use crate::hal::Board;

/// Power state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Normal operation - tick-driven polling.
    Active,
    /// Waiting for a button edge, no ticking.
    Suspended,
}

/// Decide whether the controller may suspend: button up and no gesture in
/// progress.
pub fn should_suspend(asserted: bool, pending_clicks: u8) -> bool {
    !asserted && pending_clicks == 0
}

/// Tracks the power state and performs the suspended wait.
pub struct PowerController {
    state: PowerState,
    wakeups: u32,
}

impl Default for PowerController {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerController {
    pub const fn new() -> Self {
        Self {
            state: PowerState::Active,
            wakeups: 0,
        }
    }

    /// Get current power state.
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Number of times the controller has been woken from suspension.
    pub fn wakeups(&self) -> u32 {
        self.wakeups
    }

    /// Suspend until the next edge on the button line.
    ///
    /// There is no timeout; the edge is the only way out. The wait is
    /// one-shot, so the wake event is consumed by the time this returns.
    pub async fn suspend<B: Board>(&mut self, board: &mut B) {
        self.transition(PowerState::Suspended);
        board.wait_for_input_edge().await;
        self.wakeups = self.wakeups.wrapping_add(1);
        self.transition(PowerState::Active);
    }

    fn transition(&mut self, new_state: PowerState) {
        if new_state != self.state {
            debug!("Power: {} -> {}", self.state, new_state);
            self.state = new_state;
        }
    }
}
