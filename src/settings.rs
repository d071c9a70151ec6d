//! Persistent configuration and its validation layer.
//!
//! Six settings, one byte each, stored independently:
//!
//! ```text
//! addr  field            domain  default
//! 0x00  kernel index     0..=3   0
//! 0x01  drive number     0..=1   0
//! 0x02  reset sound      0/1     1
//! 0x03  start sound      0/1     1
//! 0x04  extended wait    0/1     0
//! 0x05  mute             0/1     0
//! ```
//!
//! A byte outside its field's domain (garbage, a torn write, erased flash)
//! is replaced by the field's default on load and never reaches the rest
//! of the firmware.

use crate::config::{DRIVE_COUNT, KERNEL_COUNT};
use crate::error::Error;
use crate::hal::FieldStore;

/// One persisted setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    KernelIndex,
    DriveNumber,
    ResetSound,
    StartSound,
    ExtendedWait,
    Mute,
}

impl Field {
    /// All fields, in address order.
    pub const ALL: [Field; 6] = [
        Field::KernelIndex,
        Field::DriveNumber,
        Field::ResetSound,
        Field::StartSound,
        Field::ExtendedWait,
        Field::Mute,
    ];

    /// Storage address of the field.
    pub const fn addr(self) -> u8 {
        match self {
            Field::KernelIndex => 0x00,
            Field::DriveNumber => 0x01,
            Field::ResetSound => 0x02,
            Field::StartSound => 0x03,
            Field::ExtendedWait => 0x04,
            Field::Mute => 0x05,
        }
    }

    /// Largest valid raw value. Every domain starts at 0.
    pub const fn max(self) -> u8 {
        match self {
            Field::KernelIndex => KERNEL_COUNT - 1,
            Field::DriveNumber => DRIVE_COUNT - 1,
            _ => 1,
        }
    }

    /// Raw value used when the stored one is unusable.
    pub const fn default_raw(self) -> u8 {
        match self {
            Field::ResetSound | Field::StartSound => 1,
            _ => 0,
        }
    }

    /// `raw` if it lies in the field's domain, the default otherwise.
    pub const fn validate(self, raw: u8) -> u8 {
        if raw <= self.max() {
            raw
        } else {
            self.default_raw()
        }
    }
}

/// In-memory configuration. Every value is within its field's domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub kernel_index: u8,
    pub drive_number: u8,
    pub reset_sound_enabled: bool,
    pub start_sound_enabled: bool,
    pub extended_wait_enabled: bool,
    pub mute_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kernel_index: Field::KernelIndex.default_raw(),
            drive_number: Field::DriveNumber.default_raw(),
            reset_sound_enabled: Field::ResetSound.default_raw() != 0,
            start_sound_enabled: Field::StartSound.default_raw() != 0,
            extended_wait_enabled: Field::ExtendedWait.default_raw() != 0,
            mute_enabled: Field::Mute.default_raw() != 0,
        }
    }
}

impl Settings {
    /// Raw (stored) value of one field.
    pub fn get(&self, field: Field) -> u8 {
        match field {
            Field::KernelIndex => self.kernel_index,
            Field::DriveNumber => self.drive_number,
            Field::ResetSound => self.reset_sound_enabled as u8,
            Field::StartSound => self.start_sound_enabled as u8,
            Field::ExtendedWait => self.extended_wait_enabled as u8,
            Field::Mute => self.mute_enabled as u8,
        }
    }

    /// Set one field from a raw value, substituting the default if the value
    /// is out of domain.
    pub fn set(&mut self, field: Field, raw: u8) {
        let value = field.validate(raw);
        match field {
            Field::KernelIndex => self.kernel_index = value,
            Field::DriveNumber => self.drive_number = value,
            Field::ResetSound => self.reset_sound_enabled = value != 0,
            Field::StartSound => self.start_sound_enabled = value != 0,
            Field::ExtendedWait => self.extended_wait_enabled = value != 0,
            Field::Mute => self.mute_enabled = value != 0,
        }
    }

    /// Advance a field to the next value of its domain, wrapping at the top.
    /// For boolean fields this is a toggle.
    pub fn advance(&mut self, field: Field) {
        let current = self.get(field);
        let next = if current >= field.max() { 0 } else { current + 1 };
        self.set(field, next);
    }
}

/// Validating front-end over a [`FieldStore`].
pub struct SettingsStore<S> {
    store: S,
}

impl<S: FieldStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read and validate every field. Never fails: unreadable or
    /// out-of-domain fields come back as their defaults.
    pub async fn load(&mut self) -> Settings {
        let mut settings = Settings::default();

        for field in Field::ALL {
            match self.store.read_field(field.addr()).await {
                Ok(raw) if raw <= field.max() => settings.set(field, raw),
                Ok(raw) => {
                    warn!(
                        "Settings: {} holds {=u8:#x}, using default {}",
                        field,
                        raw,
                        field.default_raw()
                    );
                }
                Err(e) => {
                    warn!("Settings: reading {} failed ({}), using default", field, e);
                }
            }
        }

        info!("Settings loaded: {}", settings);
        settings
    }

    /// Persist one field.
    pub async fn save(&mut self, field: Field, value: u8) -> Result<(), Error> {
        self.store.write_field(field.addr(), field.validate(value)).await?;
        debug!("Settings: saved {} = {}", field, value);
        Ok(())
    }

    /// Access the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    /// RAM-backed store, one byte per address.
    struct RamStore {
        bytes: [u8; 6],
        fail_read: Option<u8>,
        fail_write: bool,
        writes: usize,
    }

    impl RamStore {
        fn with(bytes: [u8; 6]) -> Self {
            Self {
                bytes,
                fail_read: None,
                fail_write: false,
                writes: 0,
            }
        }
    }

    impl FieldStore for RamStore {
        async fn read_field(&mut self, addr: u8) -> Result<u8, Error> {
            if self.fail_read == Some(addr) {
                return Err(Error::StorageRead);
            }
            Ok(self.bytes[addr as usize])
        }

        async fn write_field(&mut self, addr: u8, value: u8) -> Result<(), Error> {
            if self.fail_write {
                return Err(Error::StorageWrite);
            }
            self.bytes[addr as usize] = value;
            self.writes += 1;
            Ok(())
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Field domain tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn addresses_are_distinct_and_ordered() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.addr() as usize, i);
        }
    }

    #[test]
    fn validate_keeps_in_domain_values() {
        for field in Field::ALL {
            for raw in 0..=field.max() {
                assert_eq!(field.validate(raw), raw);
            }
        }
    }

    #[test]
    fn validate_replaces_out_of_domain_values() {
        for field in Field::ALL {
            for raw in [field.max() + 1, 0x7F, 0xFE, 0xFF] {
                assert_eq!(field.validate(raw), field.default_raw(), "{field:?} raw {raw}");
            }
        }
    }

    #[test]
    fn default_row() {
        let s = Settings::default();
        assert_eq!(s.kernel_index, 0);
        assert_eq!(s.drive_number, 0);
        assert!(s.reset_sound_enabled);
        assert!(s.start_sound_enabled);
        assert!(!s.extended_wait_enabled);
        assert!(!s.mute_enabled);
    }

    #[test]
    fn advance_wraps_kernel_index() {
        let mut s = Settings::default();
        let mut seen = [0u8; 5];
        for slot in seen.iter_mut() {
            *slot = s.kernel_index;
            s.advance(Field::KernelIndex);
        }
        assert_eq!(seen, [0, 1, 2, 3, 0]);
    }

    #[test]
    fn advance_toggles_booleans() {
        let mut s = Settings::default();
        s.advance(Field::ResetSound);
        assert!(!s.reset_sound_enabled);
        s.advance(Field::ResetSound);
        assert!(s.reset_sound_enabled);
        s.advance(Field::DriveNumber);
        assert_eq!(s.drive_number, 1);
        s.advance(Field::DriveNumber);
        assert_eq!(s.drive_number, 0);
    }

    #[test]
    fn set_rejects_out_of_domain() {
        let mut s = Settings::default();
        s.set(Field::KernelIndex, 3);
        s.set(Field::KernelIndex, 9);
        assert_eq!(s.kernel_index, 0);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Load / save tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn load_valid_bytes() {
        let mut store = SettingsStore::new(RamStore::with([3, 1, 0, 0, 1, 1]));
        let s = block_on(store.load());
        assert_eq!(
            s,
            Settings {
                kernel_index: 3,
                drive_number: 1,
                reset_sound_enabled: false,
                start_sound_enabled: false,
                extended_wait_enabled: true,
                mute_enabled: true,
            }
        );
    }

    #[test]
    fn load_all_erased_gives_default_row() {
        let mut store = SettingsStore::new(RamStore::with([0xFF; 6]));
        assert_eq!(block_on(store.load()), Settings::default());
    }

    #[test]
    fn load_boundary_garbage_per_field() {
        // kernel 7, drive 2, reset sound 2, start sound 9, ext wait 3, mute 5
        let mut store = SettingsStore::new(RamStore::with([7, 2, 2, 9, 3, 5]));
        assert_eq!(block_on(store.load()), Settings::default());
    }

    #[test]
    fn one_garbled_field_leaves_others() {
        let mut store = SettingsStore::new(RamStore::with([2, 1, 0xA5, 0, 1, 1]));
        let s = block_on(store.load());
        assert_eq!(s.kernel_index, 2);
        assert_eq!(s.drive_number, 1);
        assert!(s.reset_sound_enabled); // default
        assert!(!s.start_sound_enabled);
        assert!(s.extended_wait_enabled);
        assert!(s.mute_enabled);
    }

    #[test]
    fn read_error_falls_back_to_default_for_that_field() {
        let mut ram = RamStore::with([2, 1, 0, 0, 1, 1]);
        ram.fail_read = Some(Field::KernelIndex.addr());
        let mut store = SettingsStore::new(ram);
        let s = block_on(store.load());
        assert_eq!(s.kernel_index, 0);
        assert_eq!(s.drive_number, 1);
        assert!(s.mute_enabled);
    }

    #[test]
    fn save_writes_exactly_one_field() {
        let mut store = SettingsStore::new(RamStore::with([0, 0, 1, 1, 0, 0]));
        block_on(store.save(Field::Mute, 1)).unwrap();
        assert_eq!(store.store().bytes, [0, 0, 1, 1, 0, 1]);
        assert_eq!(store.store().writes, 1);
    }

    #[test]
    fn save_error_is_reported() {
        let mut ram = RamStore::with([0; 6]);
        ram.fail_write = true;
        let mut store = SettingsStore::new(ram);
        assert_eq!(
            block_on(store.save(Field::DriveNumber, 1)),
            Err(Error::StorageWrite)
        );
    }
}
