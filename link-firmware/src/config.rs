// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

// ============================================================================
// HM-10 UART Konfiguration
// ============================================================================

/// GPIO-Pin für UART1 TX (→ RX des HM-10)
pub const UART_TX_GPIO_PIN: u8 = 4;

/// GPIO-Pin für UART1 RX (← TX des HM-10)
pub const UART_RX_GPIO_PIN: u8 = 5;

/// Werkseinstellung des HM-10 Moduls
pub const HM10_BAUD_RATE: u32 = 9600;

/// Pause zwischen zwei Controller-Schritten in Millisekunden
pub const LOOP_DELAY_MS: u64 = 500;

// ============================================================================
// Alarm Konfiguration
// ============================================================================

/// Mindestabstand zwischen zwei Alarm-Prüfungen in Sekunden
pub const ALARM_CHECK_INTERVAL_SECS: u32 = 60;

/// Flash-Offset der Alarm-Tabelle
/// Entspricht der NVS-Partition der Standard-Partitionstabelle
pub const ALARM_FLASH_OFFSET: u32 = 0x9000;

// ============================================================================
// Demo-Anwendung
// ============================================================================

/// Variable unter der die Uptime gemeldet wird
pub const UPTIME_VARIABLE: &str = "Uptime";

/// Intervall für unaufgeforderte Uptime-Meldungen in Sekunden
pub const UPTIME_PUBLISH_SECS: u32 = 10;

/// Kapazität des Status-Channels (Controller → LED Task)
pub const STATUS_CHANNEL_CAPACITY: usize = 4;

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die RGB LED (WS2812/Neopixel)
pub const LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Level für die LED (0-255)
/// Wert ist gedimmt für Augenschonung
pub const LED_BRIGHTNESS: u8 = 10;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 1;
