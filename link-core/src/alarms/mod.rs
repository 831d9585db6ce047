//! Persistente Alarm-Tabelle
//!
//! Fünf Slots fester Größe im nicht-flüchtigen Speicher. Jeder Slot wird
//! einzeln gelesen und sofort zurückgeschrieben (kein Puffer, kein Batching),
//! ein Neustart hinterlässt daher immer den Stand des letzten Schreibvorgangs.

mod record;
mod scheduler;
mod store;

pub use record::{
    ALARM_ID_FIELD_LEN, ALARM_ID_MAX_LEN, ALARM_ID_PREFIX, ALARM_RECORD_LEN, ALARM_SLOTS,
    ALARM_TABLE_LEN, Alarm, AlarmId, REPEAT_INTERVAL_SECS, alarm_id,
};
pub use scheduler::AlarmScheduler;
pub use store::{AlarmStore, DueAlarms};
