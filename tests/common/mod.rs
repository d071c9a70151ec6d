//! Simulated adapter board, clock and settings store for driving the
//! controller tick by tick.

#![allow(dead_code)]

use std::collections::VecDeque;

use embassy_futures::block_on;
use multikernel::{Action, Board, Clock, Controller, Error, FieldStore, Phase};

/// Something the firmware did to an output line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Reset(bool),
    Led(bool),
    Kernel(u8),
    Drive(u8),
}

/// Button script plus a log of every output change.
#[derive(Default)]
pub struct SimBoard {
    script: VecDeque<bool>,
    pub events: Vec<Event>,
    pub edges: u32,
}

impl SimBoard {
    /// Queue `ticks` samples of the button held down.
    pub fn hold(&mut self, ticks: usize) -> &mut Self {
        self.script.extend(std::iter::repeat(true).take(ticks));
        self
    }

    /// Queue one sample of the button released.
    pub fn release(&mut self) -> &mut Self {
        self.script.push_back(false);
        self
    }

    /// Queue a full press: hold for `ticks`, then release.
    pub fn press(&mut self, ticks: usize) -> &mut Self {
        self.hold(ticks).release()
    }

    pub fn script_done(&self) -> bool {
        self.script.is_empty()
    }

    pub fn count(&self, event: Event) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }

    pub fn reset_pulses(&self) -> usize {
        self.count(Event::Reset(true))
    }

    pub fn blinks(&self) -> usize {
        self.count(Event::Led(true))
    }
}

impl Board for SimBoard {
    fn input_asserted(&mut self) -> bool {
        self.script.pop_front().unwrap_or(false)
    }

    async fn wait_for_input_edge(&mut self) {
        self.edges += 1;
    }

    fn drive_reset(&mut self, asserted: bool) {
        self.events.push(Event::Reset(asserted));
    }

    fn drive_feedback(&mut self, on: bool) {
        self.events.push(Event::Led(on));
    }

    fn select_kernel(&mut self, index: u8) {
        self.events.push(Event::Kernel(index));
    }

    fn select_drive(&mut self, number: u8) {
        self.events.push(Event::Drive(number));
    }
}

/// Clock that only adds up requested sleeps.
#[derive(Default)]
pub struct SimClock {
    pub elapsed_ms: u64,
}

impl Clock for SimClock {
    async fn sleep_ms(&mut self, ms: u32) {
        self.elapsed_ms += u64::from(ms);
    }
}

/// Six-byte settings store.
pub struct RamStore {
    pub bytes: [u8; 6],
    pub writes: Vec<(u8, u8)>,
    pub fail_writes: bool,
}

impl RamStore {
    pub fn with(bytes: [u8; 6]) -> Self {
        Self {
            bytes,
            writes: Vec::new(),
            fail_writes: false,
        }
    }

    pub fn blank() -> Self {
        Self::with([0xFF; 6])
    }
}

impl FieldStore for RamStore {
    async fn read_field(&mut self, addr: u8) -> Result<u8, Error> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Error::StorageRead)
    }

    async fn write_field(&mut self, addr: u8, value: u8) -> Result<(), Error> {
        if self.fail_writes {
            return Err(Error::StorageWrite);
        }
        let slot = self.bytes.get_mut(addr as usize).ok_or(Error::StorageWrite)?;
        *slot = value;
        self.writes.push((addr, value));
        Ok(())
    }
}

pub type SimController = Controller<SimBoard, SimClock, RamStore>;

pub fn boot(store: RamStore) -> SimController {
    block_on(Controller::boot(SimBoard::default(), SimClock::default(), store))
}

/// Boot, then forget everything the boot sequence did to the outputs.
pub fn boot_quiet(store: RamStore) -> SimController {
    let mut c = boot(store);
    c.board_mut().events.clear();
    c
}

/// Poll until the queued button script has played out.
///
/// Returns the dispatched action, or `None` if the script ended without
/// completing a gesture.
pub fn run_script(c: &mut SimController) -> Option<Action> {
    block_on(async {
        for _ in 0..10_000 {
            if let Some(action) = c.poll().await {
                return Some(action);
            }
            let d = c.detector();
            if c.board().script_done() && d.phase() == Phase::Idle && d.clicks() == 0 {
                return None;
            }
        }
        panic!("controller did not settle");
    })
}

/// Queue a gesture of `clicks` clicks (one continuous hold) and run it.
pub fn gesture(c: &mut SimController, clicks: usize) -> Option<Action> {
    let threshold = multikernel::gesture::click_threshold(c.settings().extended_wait_enabled);
    c.board_mut().press(clicks * threshold as usize);
    run_script(c)
}
