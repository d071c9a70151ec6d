//! Single-button kernel switcher for a multi-ROM adapter.
//!
//! Holding the button counts clicks (one per second held, with an LED
//! blink for each). Releasing it runs the action for that count:
//!
//! | clicks | action |
//! |---|---|
//! | 1 | reset the host |
//! | 2 | next kernel |
//! | 3 | toggle drive number |
//! | 4-7 | select kernel 0-3 |
//! | 8 | toggle reset sound |
//! | 9 | toggle start sound |
//! | 10 | toggle extended wait (2 s per click) |
//! | 11 | toggle mute |
//!
//! Every setting change is saved to flash and followed by a host reset.
//!
//! The logic is hardware-independent and tested on the host with
//! `cargo test`. The nRF52840 firmware in `main.rs` wires it to real pins,
//! flash and timers (`--features embedded`).

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod action;
pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod flash;
pub mod gesture;
pub mod hal;
pub mod power;
pub mod settings;

pub use action::{Action, ActionDispatcher};
pub use controller::Controller;
pub use error::Error;
pub use gesture::{GestureDetector, Phase, Step};
pub use hal::{Board, Clock, FieldStore};
pub use power::{PowerController, PowerState};
pub use settings::{Field, Settings, SettingsStore};
