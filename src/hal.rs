//! Hardware capabilities the controller logic runs against.
//!
//! The gesture, settings and dispatch code never touch pins, flash or
//! timers directly. They go through three small traits:
//!
//! - [`Board`]: the button input and the reset, LED and select outputs
//! - [`Clock`]: blocking-style sleeps (async, so the executor can idle)
//! - [`FieldStore`]: byte-addressable, non-transactional settings storage
//!
//! [`PinBoard`] implements [`Board`] over `embedded-hal` pins, which is
//! what the firmware uses. Tests substitute simulated implementations.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::digital::Wait;

use crate::config::TICK_MS;
use crate::error::Error;

/// Button and output lines of the adapter board.
#[allow(async_fn_in_trait)]
pub trait Board {
    /// Current button level, `true` while pressed.
    fn input_asserted(&mut self) -> bool;

    /// Wait for the next edge on the button line. One-shot: any edge that
    /// happened before the call does not complete it.
    async fn wait_for_input_edge(&mut self);

    /// Assert or release the host reset line.
    fn drive_reset(&mut self, asserted: bool);

    /// Switch the feedback LED.
    fn drive_feedback(&mut self, on: bool);

    /// Put `index` (0..=3) on the kernel address lines.
    fn select_kernel(&mut self, index: u8);

    /// Put `number` (0..=1) on the drive-number line.
    fn select_drive(&mut self, number: u8);
}

/// Time source. Every delay in the controller goes through here.
#[allow(async_fn_in_trait)]
pub trait Clock {
    async fn sleep_ms(&mut self, ms: u32);

    /// Sleep one detector tick.
    async fn sleep_one_tick(&mut self) {
        self.sleep_ms(TICK_MS).await;
    }
}

/// Byte-per-field persistent storage.
///
/// Writes to different addresses are independent. There is no multi-field
/// transaction.
#[allow(async_fn_in_trait)]
pub trait FieldStore {
    async fn read_field(&mut self, addr: u8) -> Result<u8, Error>;

    async fn write_field(&mut self, addr: u8, value: u8) -> Result<(), Error>;
}

/// Which electrical level means "active" on a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Active when high (push-button to VCC with pull-down, LED to GND).
    ActiveHigh,
    /// Active when low (push-button to GND with pull-up, open-drain reset).
    ActiveLow,
}

impl Polarity {
    /// Electrical level (`true` = high) for the logical state.
    pub const fn level(self, active: bool) -> bool {
        match self {
            Polarity::ActiveHigh => active,
            Polarity::ActiveLow => !active,
        }
    }
}

fn set_level<P: OutputPin>(pin: &mut P, high: bool) {
    // GPIO writes on the supported HALs are infallible.
    let _ = if high { pin.set_high() } else { pin.set_low() };
}

/// Electrical polarity of each line on a [`PinBoard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Polarities {
    pub button: Polarity,
    pub reset: Polarity,
    pub feedback: Polarity,
}

impl Default for Polarities {
    /// Reference wiring: button to GND, open-drain reset, LED sinks to GND
    /// through the pin.
    fn default() -> Self {
        Self {
            button: Polarity::ActiveLow,
            reset: Polarity::ActiveLow,
            feedback: Polarity::ActiveLow,
        }
    }
}

/// Output pins driven by a [`PinBoard`].
pub struct OutputLines<O> {
    /// Host reset, released (inactive) except during a pulse.
    pub reset: O,
    /// Feedback LED.
    pub feedback: O,
    /// Kernel address bit 0.
    pub kernel_a0: O,
    /// Kernel address bit 1.
    pub kernel_a1: O,
    /// Drive-number select.
    pub drive: O,
}

/// [`Board`] implementation over `embedded-hal` pins.
pub struct PinBoard<I, O> {
    button: I,
    outputs: OutputLines<O>,
    polarities: Polarities,
}

impl<I, O> PinBoard<I, O>
where
    I: InputPin + Wait,
    O: OutputPin,
{
    /// Take ownership of the pins and put every output in its idle state:
    /// reset released, LED off, select lines low.
    pub fn new(button: I, outputs: OutputLines<O>, polarities: Polarities) -> Self {
        let mut board = Self {
            button,
            outputs,
            polarities,
        };
        board.drive_reset(false);
        board.drive_feedback(false);
        board.select_kernel(0);
        board.select_drive(0);
        board
    }

    /// Give the pins back.
    pub fn release(self) -> (I, OutputLines<O>) {
        (self.button, self.outputs)
    }
}

impl<I, O> Board for PinBoard<I, O>
where
    I: InputPin + Wait,
    O: OutputPin,
{
    fn input_asserted(&mut self) -> bool {
        match self.button.is_high() {
            Ok(high) => high == self.polarities.button.level(true),
            Err(_) => false,
        }
    }

    async fn wait_for_input_edge(&mut self) {
        let _ = self.button.wait_for_any_edge().await;
    }

    fn drive_reset(&mut self, asserted: bool) {
        let level = self.polarities.reset.level(asserted);
        set_level(&mut self.outputs.reset, level);
    }

    fn drive_feedback(&mut self, on: bool) {
        let level = self.polarities.feedback.level(on);
        set_level(&mut self.outputs.feedback, level);
    }

    fn select_kernel(&mut self, index: u8) {
        set_level(&mut self.outputs.kernel_a0, index & 0x01 != 0);
        set_level(&mut self.outputs.kernel_a1, index & 0x02 != 0);
    }

    fn select_drive(&mut self, number: u8) {
        set_level(&mut self.outputs.drive, number & 0x01 != 0);
    }
}
