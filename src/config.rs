//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, gesture thresholds and the flash layout live
//! here so they can be tuned in one place.

// Gesture timing

/// Period of one detector tick (ms). The button is sampled once per tick.
pub const TICK_MS: u32 = 100;

/// Consecutive held ticks needed for one click (10 × 100 ms = 1.0 s).
pub const BASE_THRESHOLD_TICKS: u16 = 10;

/// Extra held ticks added when extended wait is enabled (→ 2.0 s).
pub const EXTENDED_EXTRA_TICKS: u16 = 10;

/// Highest click count a gesture can reach. Further clicks are absorbed.
pub const MAX_CLICKS: u8 = 11;

// Feedback patterns (LED on/off times in ms)

/// Click confirmation blink.
pub const CLICK_BLINK_ON_MS: u32 = 100;
pub const CLICK_BLINK_OFF_MS: u32 = 100;

/// Blink played while the reset line is held. Its total length is also the
/// reset pulse width, whether or not the blink is shown.
pub const RESET_BLINK_ON_MS: u32 = 200;
pub const RESET_BLINK_OFF_MS: u32 = 50;

/// Startup flash sequence.
pub const STARTUP_BLINK_ON_MS: u32 = 50;
pub const STARTUP_BLINK_OFF_MS: u32 = 50;
pub const STARTUP_BLINK_REPEATS: u8 = 5;

/// Time the kernel/drive select lines get to settle before the reset pulse.
pub const SELECT_SETTLE_MS: u32 = 20;

// Select lines

/// Number of selectable kernel images (two address lines).
pub const KERNEL_COUNT: u8 = 4;

/// Number of selectable drive numbers (one line).
pub const DRIVE_COUNT: u8 = 2;

// Settings storage
//
// Each setting is one map item keyed by its field address. The region
// sits above the firmware image, see memory.x.

/// Flash page size for nRF52840 (4 KB).
pub const FLASH_PAGE_SIZE: u32 = 4096;

/// Flash page index where settings storage starts.
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for settings storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

/// Value an erased (never written) flash byte reads as.
pub const ERASED_BYTE: u8 = 0xFF;
