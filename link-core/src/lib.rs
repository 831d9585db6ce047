//! HM-10 Link Core - Plattform-unabhängige Protokoll-Engine
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert die Traits für Transport, Speicher und Zeitquelle sowie
//! die komplette Logik: Framing, Dispatch, Alarm-Tabelle und Uhr.

#![no_std]

// Logging-Makros müssen vor allen anderen Modulen stehen
#[macro_use]
mod fmt;

pub mod alarms;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod controller;
pub mod framer;
pub mod logic;
pub mod outbound;
pub mod storage;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use alarms::{Alarm, AlarmId, AlarmScheduler, AlarmStore, ALARM_SLOTS, REPEAT_INTERVAL_SECS};
pub use calendar::{BrokenTime, break_time, is_leap_year};
pub use clock::Clock;
pub use config::{ControllerConfig, DrainPolicy};
pub use controller::{Controller, PendingAlarm};
pub use framer::{FramerMode, MessageFramer};
pub use logic::{parse_flag, parse_u32, status_color};
pub use outbound::Outbound;
pub use storage::{MemoryStorage, NoStorage};
pub use traits::{
    ControllerHandler, LedError, Monotonic, PersistentStorage, SmartLedWriter, StorageError,
    Transport, TransportError,
};
pub use types::{FramerEvent, LinkStatus, Message, VALUE_LEN, VARIABLE_LEN};
