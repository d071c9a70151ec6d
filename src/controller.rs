//! Top-level control loop.
//!
//! Owns the board, the clock, the settings and every component, and runs
//! them from a single task:
//!
//! 1. boot: load settings, drive the select lines, reset the host, play
//!    the startup cue
//! 2. loop: sample the button once per tick, blink on each click, dispatch
//!    completed gestures, suspend while nothing is happening

use crate::action::{self, Action, ActionDispatcher};
use crate::feedback::{self, Cue};
use crate::gesture::{GestureDetector, Phase, Step};
use crate::hal::{Board, Clock, FieldStore};
use crate::power::PowerController;
use crate::settings::{Settings, SettingsStore};

pub struct Controller<B, C, S> {
    board: B,
    clock: C,
    settings: Settings,
    detector: GestureDetector,
    dispatcher: ActionDispatcher<S>,
    power: PowerController,
}

impl<B, C, S> Controller<B, C, S>
where
    B: Board,
    C: Clock,
    S: FieldStore,
{
    /// Load settings from `store` and bring the host up on the stored kernel.
    pub async fn boot(mut board: B, mut clock: C, store: S) -> Self {
        let mut store = SettingsStore::new(store);
        let settings = store.load().await;

        action::drive_select_lines(&mut board, &settings);
        action::reset_pulse(&settings, &mut board, &mut clock).await;
        feedback::emit(Cue::Startup, &settings, &mut board, &mut clock).await;

        info!(
            "Boot: kernel {}, drive {}",
            settings.kernel_index,
            settings.drive_number
        );

        Self {
            board,
            clock,
            settings,
            detector: GestureDetector::new(),
            dispatcher: ActionDispatcher::new(store),
            power: PowerController::new(),
        }
    }

    /// Run one detector step and carry out what it asks for.
    ///
    /// Returns the action when a gesture was dispatched.
    pub async fn poll(&mut self) -> Option<Action> {
        // The button is only sampled while counting.
        let asserted = self.detector.phase() == Phase::Idle && self.board.input_asserted();
        let step = self
            .detector
            .poll(asserted, self.settings.extended_wait_enabled);

        if step.consumes_tick() {
            self.clock.sleep_one_tick().await;
        }

        match step {
            Step::Holding | Step::Saturated | Step::Released | Step::Captured => None,
            Step::Click { clicks } => {
                debug!("Gesture: click {}", clicks);
                feedback::emit(Cue::Click, &self.settings, &mut self.board, &mut self.clock).await;
                None
            }
            Step::Suspend => {
                self.power.suspend(&mut self.board).await;
                // Let the edge that woke us settle before sampling.
                self.clock.sleep_one_tick().await;
                None
            }
            Step::Gesture { clicks } => {
                let action = Action::from_clicks(clicks);
                self.dispatcher
                    .execute(action, &mut self.settings, &mut self.board, &mut self.clock)
                    .await;
                Some(action)
            }
        }
    }

    /// Poll forever.
    pub async fn run(mut self) -> ! {
        loop {
            self.poll().await;
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn detector(&self) -> &GestureDetector {
        &self.detector
    }

    pub fn power(&self) -> &PowerController {
        &self.power
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        self.dispatcher.store().store()
    }
}
