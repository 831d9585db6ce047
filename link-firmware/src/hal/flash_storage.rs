// Alarm-Tabelle im internen Flash
//
// Die Tabelle (ALARM_TABLE_LEN Bytes) liegt ab ALARM_FLASH_OFFSET.
// `esp_storage::FlashStorage` übernimmt Read-Modify-Write der Sektoren.

use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;
use hm10_core::alarms::ALARM_TABLE_LEN;
use hm10_core::{PersistentStorage, StorageError};

pub struct FlashAlarmStorage {
    flash: FlashStorage<'static>,
    base: u32,
}

impl FlashAlarmStorage {
    pub fn new(flash: esp_hal::peripherals::FLASH<'static>, base: u32) -> Self {
        Self {
            flash: FlashStorage::new(flash),
            base,
        }
    }

    fn address(&self, offset: usize, len: usize) -> Result<u32, StorageError> {
        match offset.checked_add(len) {
            Some(end) if end <= ALARM_TABLE_LEN => Ok(self.base + offset as u32),
            _ => Err(StorageError::OutOfBounds),
        }
    }
}

impl PersistentStorage for FlashAlarmStorage {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let address = self.address(offset, buf.len())?;
        self.flash.read(address, buf).map_err(|e| {
            defmt::error!("Flash: read at {:#x} failed: {}", address, defmt::Debug2Format(&e));
            StorageError::ReadFailed
        })
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError> {
        let address = self.address(offset, bytes.len())?;
        self.flash.write(address, bytes).map_err(|e| {
            defmt::error!("Flash: write at {:#x} failed: {}", address, defmt::Debug2Format(&e));
            StorageError::WriteFailed
        })
    }
}
