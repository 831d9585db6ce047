//! Speicher-Implementierungen ohne Hardware
//!
//! - `MemoryStorage`: RAM-Array mit EEPROM-Semantik (Tests, Simulation)
//! - `NoStorage`: Platzhalter für Controller ohne Alarm-Unterstützung

use crate::alarms::ALARM_TABLE_LEN;
use crate::traits::{PersistentStorage, StorageError};

/// Wert von gelöschtem Flash / fabrikneuem EEPROM
pub const ERASED_BYTE: u8 = 0xFF;

/// In-memory Block-Speicher
///
/// Startet im gelöschten Zustand (alle Bytes `0xFF`) und zählt Schreibzugriffe.
#[derive(Clone, Debug)]
pub struct MemoryStorage<const N: usize = ALARM_TABLE_LEN> {
    bytes: [u8; N],
    writes: usize,
}

impl<const N: usize> Default for MemoryStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MemoryStorage<N> {
    pub fn new() -> Self {
        Self::from_bytes([ERASED_BYTE; N])
    }

    pub fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes, writes: 0 }
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Anzahl der `write` Aufrufe seit Erstellung
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn range(offset: usize, len: usize) -> Result<core::ops::Range<usize>, StorageError> {
        let end = offset.checked_add(len).ok_or(StorageError::OutOfBounds)?;
        if end > N {
            return Err(StorageError::OutOfBounds);
        }
        Ok(offset..end)
    }
}

impl<const N: usize> PersistentStorage for MemoryStorage<N> {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let range = Self::range(offset, buf.len())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError> {
        let range = Self::range(offset, bytes.len())?;
        self.bytes[range].copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}

/// Kein Speicher vorhanden, jeder Zugriff schlägt fehl
#[derive(Clone, Copy, Debug, Default)]
pub struct NoStorage;

impl PersistentStorage for NoStorage {
    fn read(&mut self, _offset: usize, _buf: &mut [u8]) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn write(&mut self, _offset: usize, _bytes: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}
