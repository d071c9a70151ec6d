//! Click count → action table and action execution.
//!
//! ```text
//! clicks  action
//!   1     reset
//!   2     next kernel (wraps 3 → 0)
//!   3     toggle drive number
//!   4-7   select kernel 0-3
//!   8     toggle reset sound
//!   9     toggle start sound
//!  10     toggle extended wait
//!  11     toggle mute
//! other   reset
//! ```
//!
//! Every configuration action is saved and followed by a reset pulse so the
//! host restarts on the new configuration.

use crate::config::SELECT_SETTLE_MS;
use crate::feedback::{self, Cue};
use crate::hal::{Board, Clock, FieldStore};
use crate::settings::{Field, Settings, SettingsStore};

/// What a completed gesture asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    Reset,
    ToggleKernel,
    ToggleDrive,
    SelectKernel(u8),
    ToggleResetSound,
    ToggleStartSound,
    ToggleExtendedWait,
    ToggleMute,
}

impl Action {
    /// Map a gesture's click count to its action.
    pub const fn from_clicks(clicks: u8) -> Self {
        match clicks {
            1 => Action::Reset,
            2 => Action::ToggleKernel,
            3 => Action::ToggleDrive,
            4..=7 => Action::SelectKernel(clicks - 4),
            8 => Action::ToggleResetSound,
            9 => Action::ToggleStartSound,
            10 => Action::ToggleExtendedWait,
            11 => Action::ToggleMute,
            _ => Action::Reset,
        }
    }

    /// The setting this action changes, `None` for a plain reset.
    pub const fn field(self) -> Option<Field> {
        match self {
            Action::Reset => None,
            Action::ToggleKernel | Action::SelectKernel(_) => Some(Field::KernelIndex),
            Action::ToggleDrive => Some(Field::DriveNumber),
            Action::ToggleResetSound => Some(Field::ResetSound),
            Action::ToggleStartSound => Some(Field::StartSound),
            Action::ToggleExtendedWait => Some(Field::ExtendedWait),
            Action::ToggleMute => Some(Field::Mute),
        }
    }

    /// Apply the action to `settings`. Returns the changed field.
    pub fn apply(self, settings: &mut Settings) -> Option<Field> {
        let field = self.field()?;
        match self {
            Action::SelectKernel(index) => settings.set(field, index),
            _ => settings.advance(field),
        }
        Some(field)
    }
}

/// Put the kernel and drive selection from `settings` on the select lines.
pub fn drive_select_lines<B: Board>(board: &mut B, settings: &Settings) {
    board.select_kernel(settings.kernel_index);
    board.select_drive(settings.drive_number);
}

/// Pulse the host reset line, with the reset cue if enabled.
///
/// The pulse width is the reset pattern's length either way.
pub async fn reset_pulse<B: Board, C: Clock>(settings: &Settings, board: &mut B, clock: &mut C) {
    board.drive_reset(true);
    if !feedback::emit(Cue::Reset, settings, board, clock).await {
        clock.sleep_ms(Cue::Reset.pattern().duration_ms()).await;
    }
    board.drive_reset(false);
}

/// Executes actions against the settings and the board.
pub struct ActionDispatcher<S> {
    store: SettingsStore<S>,
}

impl<S: FieldStore> ActionDispatcher<S> {
    pub fn new(store: SettingsStore<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SettingsStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SettingsStore<S> {
        &mut self.store
    }

    /// Execute `action`: change and save at most one setting, update the
    /// select lines, then reset the host.
    pub async fn execute<B: Board, C: Clock>(
        &mut self,
        action: Action,
        settings: &mut Settings,
        board: &mut B,
        clock: &mut C,
    ) {
        info!("Action: {}", action);

        if let Some(field) = action.apply(settings) {
            let value = settings.get(field);
            if let Err(e) = self.store.save(field, value).await {
                error!("Action: saving {} failed: {}", field, e);
            }
            drive_select_lines(board, settings);
            clock.sleep_ms(SELECT_SETTLE_MS).await;
        }

        reset_pulse(settings, board, clock).await;
    }
}
