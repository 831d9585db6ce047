// Library-Root: HM-10 Firmware für den ESP32-C6
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod app;
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von hm10-core
pub use hm10_core::{
    AlarmStore, Controller, ControllerConfig, LinkStatus, SmartLedWriter, status_color,
};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::app::DemoHandler;
use crate::config::STATUS_CHANNEL_CAPACITY;
use crate::hal::{EmbassyUptime, FlashAlarmStorage, UartTransport};

// ============================================================================
// Type-Aliase
// ============================================================================

/// Controller mit UART-Transport, Embassy-Uhr und Alarm-Tabelle im Flash
pub type LinkController = Controller<UartTransport, EmbassyUptime, DemoHandler, FlashAlarmStorage>;

/// Fallback wenn die Alarm-Tabelle nicht geöffnet werden kann
pub type BasicController = Controller<UartTransport, EmbassyUptime, DemoHandler>;

/// Channel für Status-Änderungen (Controller Task → LED Task)
pub type StatusChannel = Channel<NoopRawMutex, LinkStatus, STATUS_CHANNEL_CAPACITY>;

/// Sender für Status-Änderungen (im DemoHandler)
pub type StatusSender = Sender<'static, NoopRawMutex, LinkStatus, STATUS_CHANNEL_CAPACITY>;

/// Receiver für Status-Änderungen (LED Task)
pub type StatusReceiver = Receiver<'static, NoopRawMutex, LinkStatus, STATUS_CHANNEL_CAPACITY>;
