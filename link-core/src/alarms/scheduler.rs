//! Feuert fällige Alarme und plant wiederholende neu ein

use heapless::Vec;

use super::record::{ALARM_SLOTS, Alarm, REPEAT_INTERVAL_SECS};
use super::store::AlarmStore;
use crate::traits::{PersistentStorage, StorageError};

pub struct AlarmScheduler<S: PersistentStorage> {
    store: AlarmStore<S>,
}

impl<S: PersistentStorage> AlarmScheduler<S> {
    pub fn new(store: AlarmStore<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &AlarmStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AlarmStore<S> {
        &mut self.store
    }

    /// Feuert alle Alarme mit `due < now`
    ///
    /// `on_fired` bekommt die ID ohne Speicher-Prefix. Wiederholende Alarme
    /// werden um genau `REPEAT_INTERVAL_SECS` verschoben, einmalige gelöscht.
    /// Kann beliebig oft aufgerufen werden; gibt die Anzahl gefeuerter Alarme zurück.
    pub fn scan<F>(&mut self, now: u32, mut on_fired: F) -> Result<usize, StorageError>
    where
        F: FnMut(&str),
    {
        let due: Vec<(usize, Alarm), ALARM_SLOTS> =
            self.store.scan_due(now).collect::<Result<_, _>>()?;

        for (index, alarm) in &due {
            on_fired(&alarm.id);

            if alarm.repeat {
                let next = Alarm {
                    due: alarm.due.wrapping_add(REPEAT_INTERVAL_SECS),
                    ..alarm.clone()
                };
                debug!("alarm {} rescheduled at {}", next.id.as_str(), next.due);
                self.store.write_alarm(*index, &next)?;
            } else {
                self.store.clear_slot(*index)?;
            }
        }

        Ok(due.len())
    }
}
