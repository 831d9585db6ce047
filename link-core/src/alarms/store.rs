//! Alarm-Tabelle: CRUD über die String-ID, Slot für Slot durchgeschrieben

use heapless::Vec;

use super::record::{ALARM_RECORD_LEN, ALARM_SLOTS, Alarm, Slot, alarm_id, empty_record};
use crate::traits::{PersistentStorage, StorageError};

pub struct AlarmStore<S: PersistentStorage> {
    storage: S,
}

impl<S: PersistentStorage> AlarmStore<S> {
    /// Öffnet die Tabelle und repariert uninitialisierte Slots
    ///
    /// Jeder Slot ohne `'A'` Prefix (z.B. gelöschter Flash mit 0xFF) wird
    /// auf leer zurückgesetzt. Bereits leere oder belegte Slots bleiben unverändert.
    pub fn new(storage: S) -> Result<Self, StorageError> {
        let mut store = Self { storage };

        for index in 0..ALARM_SLOTS {
            if store.read_slot(index)? == Slot::Uninitialized {
                debug!("alarm slot {} uninitialized, resetting", index);
                store.write_record(index, &empty_record())?;
            }
        }

        Ok(store)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Belegter Slot an `index`, `None` für leere Slots oder ungültigen Index
    pub fn slot(&mut self, index: usize) -> Result<Option<Alarm>, StorageError> {
        if index >= ALARM_SLOTS {
            return Ok(None);
        }
        Ok(self.read_slot(index)?.into_alarm())
    }

    pub fn get(&mut self, id: &str) -> Result<Option<Alarm>, StorageError> {
        Ok(self.find(id)?.map(|(_, alarm)| alarm))
    }

    /// Alle belegten Slots mit Index
    pub fn alarms(&mut self) -> Result<Vec<(usize, Alarm), ALARM_SLOTS>, StorageError> {
        let mut alarms = Vec::new();
        for index in 0..ALARM_SLOTS {
            if let Some(alarm) = self.read_slot(index)?.into_alarm() {
                // Kapazität = ALARM_SLOTS, kann nicht überlaufen
                let _ = alarms.push((index, alarm));
            }
        }
        Ok(alarms)
    }

    /// Legt einen Alarm an oder aktualisiert ihn im selben Slot
    ///
    /// Gibt den Slot-Index zurück. `None` bedeutet: Tabelle voll oder leere
    /// ID, der Alarm wurde stillschweigend verworfen.
    pub fn create_or_update(
        &mut self,
        id: &str,
        due: u32,
        repeat: bool,
    ) -> Result<Option<usize>, StorageError> {
        let id = alarm_id(id);
        if id.is_empty() {
            return Ok(None);
        }

        let alarm = Alarm { id, due, repeat };

        // Update
        if let Some((index, _)) = self.find(&alarm.id)? {
            self.write_alarm(index, &alarm)?;
            return Ok(Some(index));
        }

        // Create
        for index in 0..ALARM_SLOTS {
            if !matches!(self.read_slot(index)?, Slot::Occupied(_)) {
                self.write_alarm(index, &alarm)?;
                return Ok(Some(index));
            }
        }

        warn!("alarm table full, dropping {}", alarm.id.as_str());
        Ok(None)
    }

    /// Löscht den Alarm `id`, `false` wenn er nicht existiert
    pub fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        match self.find(id)? {
            Some((index, _)) => {
                self.clear_slot(index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Lazy Durchlauf über alle belegten Slots mit `due < now`
    pub fn scan_due(&mut self, now: u32) -> DueAlarms<'_, S> {
        DueAlarms {
            store: self,
            now,
            next: 0,
        }
    }

    pub(crate) fn write_alarm(&mut self, index: usize, alarm: &Alarm) -> Result<(), StorageError> {
        self.write_record(index, &alarm.encode())
    }

    pub(crate) fn clear_slot(&mut self, index: usize) -> Result<(), StorageError> {
        self.write_record(index, &empty_record())
    }

    fn find(&mut self, id: &str) -> Result<Option<(usize, Alarm)>, StorageError> {
        let id = alarm_id(id);
        if id.is_empty() {
            return Ok(None);
        }

        for index in 0..ALARM_SLOTS {
            if let Slot::Occupied(alarm) = self.read_slot(index)? {
                if alarm.id == id {
                    return Ok(Some((index, alarm)));
                }
            }
        }
        Ok(None)
    }

    fn read_slot(&mut self, index: usize) -> Result<Slot, StorageError> {
        let mut record = [0u8; ALARM_RECORD_LEN];
        self.storage.read(index * ALARM_RECORD_LEN, &mut record)?;
        Ok(Slot::decode(&record))
    }

    fn write_record(
        &mut self,
        index: usize,
        record: &[u8; ALARM_RECORD_LEN],
    ) -> Result<(), StorageError> {
        self.storage.write(index * ALARM_RECORD_LEN, record)
    }
}

/// Iterator über fällige Alarme, siehe [`AlarmStore::scan_due`]
pub struct DueAlarms<'a, S: PersistentStorage> {
    store: &'a mut AlarmStore<S>,
    now: u32,
    next: usize,
}

impl<S: PersistentStorage> Iterator for DueAlarms<'_, S> {
    type Item = Result<(usize, Alarm), StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < ALARM_SLOTS {
            let index = self.next;
            self.next += 1;

            match self.store.read_slot(index) {
                Ok(Slot::Occupied(alarm)) if alarm.due < self.now => {
                    return Some(Ok((index, alarm)));
                }
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> AlarmStore<MemoryStorage> {
        AlarmStore::new(MemoryStorage::new()).unwrap()
    }

    #[test]
    fn test_init_heals_erased_storage() {
        let store = store();
        let bytes = store.storage().as_bytes();
        for index in 0..ALARM_SLOTS {
            assert_eq!(bytes[index * ALARM_RECORD_LEN], b'A');
            assert_eq!(bytes[index * ALARM_RECORD_LEN + 1], 0);
        }
    }

    #[test]
    fn test_init_keeps_existing_alarms() {
        let mut store = store();
        store.create_or_update("wake", 1_000, true).unwrap();

        let mut reopened = AlarmStore::new(store.into_storage()).unwrap();
        assert_eq!(
            reopened.get("wake").unwrap(),
            Some(Alarm::new("wake", 1_000, true))
        );
    }

    #[test]
    fn test_scan_due_is_strictly_before_now() {
        let mut store = store();
        store.create_or_update("a", 100, false).unwrap();
        store.create_or_update("b", 200, false).unwrap();

        let due: heapless::Vec<usize, ALARM_SLOTS> =
            store.scan_due(200).map(|r| r.unwrap().0).collect();
        assert_eq!(due.as_slice(), &[0]);
    }

    #[test]
    fn test_empty_id_is_ignored() {
        let mut store = store();
        assert_eq!(store.create_or_update("", 100, false).unwrap(), None);
        assert!(!store.remove("").unwrap());
    }
}
