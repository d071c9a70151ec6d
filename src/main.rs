//! multikernel firmware for nRF52840.
//!
//! Pin assignments (nRF52840-DK defaults, adjust for your adapter PCB):
//!
//!   Button (RESTORE)   → P0.11, active-low, internal pull-up
//!   Feedback LED       → P0.13, active-low (LED1)
//!   Host reset         → P0.31, open-drain, pulled low while asserted
//!   Kernel address A0  → P0.28
//!   Kernel address A1  → P0.29
//!   Drive select       → P0.30
//!
//! Settings live in the last flash pages, see `config::STORAGE_FLASH_PAGE_START`.

#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::nvmc::Nvmc;
use embassy_time::Timer;
use panic_probe as _;

use multikernel::flash::{FlashFieldStore, STORAGE_RANGE};
use multikernel::hal::{OutputLines, PinBoard, Polarities};
use multikernel::{Clock, Controller};

/// [`Clock`] on the embassy time driver (RTC1).
struct EmbassyClock;

impl Clock for EmbassyClock {
    async fn sleep_ms(&mut self, ms: u32) {
        Timer::after_millis(u64::from(ms)).await;
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("multikernel {} starting", env!("CARGO_PKG_VERSION"));

    let button = Input::new(p.P0_11, Pull::Up);
    let outputs = OutputLines {
        reset: Output::new(p.P0_31, Level::High, OutputDrive::Standard0Disconnect1),
        feedback: Output::new(p.P0_13, Level::High, OutputDrive::Standard),
        kernel_a0: Output::new(p.P0_28, Level::Low, OutputDrive::Standard),
        kernel_a1: Output::new(p.P0_29, Level::Low, OutputDrive::Standard),
        drive: Output::new(p.P0_30, Level::Low, OutputDrive::Standard),
    };
    let board = PinBoard::new(button, outputs, Polarities::default());

    let flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let store = FlashFieldStore::new(flash, STORAGE_RANGE);

    let controller = Controller::boot(board, EmbassyClock, store).await;
    controller.run().await
}
