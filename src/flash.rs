//! Settings storage on NOR flash.
//!
//! Uses the `sequential-storage` map: each setting is its own item, keyed
//! by the field address. Items are appended, so rewriting one setting never
//! touches the bytes of another, and a write torn by power loss only
//! affects the item being written (its CRC fails and the previous value or
//! the default is used). Page erase, wear levelling and garbage collection
//! are handled by `sequential-storage`.

use core::ops::Range;

use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

use crate::config::{ERASED_BYTE, FLASH_PAGE_SIZE, STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use crate::error::Error;
use crate::hal::FieldStore;

/// Default settings region on nRF52840.
pub const STORAGE_RANGE: Range<u32> = (STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE)
    ..((STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE);

/// Scratch buffer size for one map item (key + value + header, aligned).
const ITEM_BUFFER_SIZE: usize = 32;

fn map_error<E>(e: sequential_storage::Error<E>, fallback: Error) -> Error {
    match e {
        sequential_storage::Error::FullStorage => Error::StorageFull,
        sequential_storage::Error::Corrupted { .. } => Error::StorageCorrupted,
        _ => fallback,
    }
}

/// [`FieldStore`] on a flash region.
pub struct FlashFieldStore<F> {
    flash: F,
    range: Range<u32>,
}

impl<F: NorFlash> FlashFieldStore<F> {
    pub fn new(flash: F, range: Range<u32>) -> Self {
        Self { flash, range }
    }

    /// Give the flash driver back.
    pub fn release(self) -> F {
        self.flash
    }
}

impl<F: NorFlash> FieldStore for FlashFieldStore<F> {
    async fn read_field(&mut self, addr: u8) -> Result<u8, Error> {
        let mut buf = [0u8; ITEM_BUFFER_SIZE];
        let item = fetch_item::<u8, u8, _>(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            &mut buf,
            &addr,
        )
        .await
        .map_err(|e| map_error(e, Error::StorageRead))?;

        Ok(item.unwrap_or(ERASED_BYTE))
    }

    async fn write_field(&mut self, addr: u8, value: u8) -> Result<(), Error> {
        let mut buf = [0u8; ITEM_BUFFER_SIZE];
        store_item::<u8, u8, _>(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            &mut buf,
            &addr,
            &value,
        )
        .await
        .map_err(|e| map_error(e, Error::StorageWrite))
    }
}
