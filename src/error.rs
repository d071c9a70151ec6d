//! Unified error type for multikernel.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// Flash read failed.
    StorageRead,

    /// Flash write or erase failed.
    StorageWrite,

    /// The stored record failed its integrity check.
    StorageCorrupted,

    /// No free space left in the settings region.
    StorageFull,
}
