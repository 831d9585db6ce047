// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus hm10-core für die ESP32-C6 Peripherie.
// Die Logik selbst liegt in hm10-core und wird auf dem Host getestet.

pub mod flash_storage;
pub mod led_writer;
pub mod uart_transport;
pub mod uptime;

pub use flash_storage::FlashAlarmStorage;
pub use led_writer::RmtLedWriter;
pub use uart_transport::UartTransport;
pub use uptime::EmbassyUptime;
