//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Transport, nicht-flüchtigen
//! Speicher, Zeitquelle und Anwendungs-Callbacks ohne konkrete Implementierung.

use rgb::RGB8;

use crate::outbound::Outbound;

// ============================================================================
// Fehler-Typen
// ============================================================================

/// Fehler-Typ für Speicher-Operationen (EEPROM / Flash)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Offset + Länge liegt außerhalb des Speichers
    OutOfBounds,
    ReadFailed,
    WriteFailed,
    /// Kein Speicher konfiguriert
    Unavailable,
}

/// Fehler-Typ für Transport-Schreiboperationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    WriteFailed,
}

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

// ============================================================================
// Kollaborateure
// ============================================================================

/// Serieller Byte-Transport zum Host (z.B. HM-10 über UART)
///
/// # Implementierungen
/// - **Production:** UartTransport (ESP32 UART Peripheral)
/// - **Testing:** MockTransport (in-memory Queue)
pub trait Transport {
    /// Liefert das nächste verfügbare Byte, blockiert nie
    fn read_byte(&mut self) -> Option<u8>;

    /// Schreibt alle Bytes
    ///
    /// # Fehlerbehandlung
    /// Gibt `TransportError::WriteFailed` zurück wenn die Hardware ablehnt
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Ist der Transport offen? Schreiben auf einen geschlossenen
    /// Transport ist ein No-op.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Block-Speicher mit Byte-Offsets (EEPROM-Semantik)
///
/// Jeder `write` muss synchron und vollständig abgeschlossen sein,
/// bevor er zurückkehrt.
pub trait PersistentStorage {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Monotone Zeitquelle: Sekunden seit Boot
pub trait Monotonic {
    fn elapsed_secs(&self) -> u32;
}

/// Anwendungs-Callbacks des Controllers
///
/// Ersetzt die Funktionszeiger des klassischen Controllers durch ein Trait.
/// Jeder Callback bekommt einen `Outbound` Writer, um direkt antworten zu können.
/// Nur `on_incoming_message` ist Pflicht, alle anderen sind No-ops.
pub trait ControllerHandler {
    /// Nicht reservierte `variable=value` Nachricht vom Host
    fn on_incoming_message(&mut self, variable: &str, value: &str, out: &mut Outbound<'_>);

    /// Host verlangt Synchronisation der Variable `variable`
    fn on_sync(&mut self, _variable: &str, _out: &mut Outbound<'_>) {}

    /// Alarm `id` ist fällig geworden
    fn on_alarm_fired(&mut self, _id: &str, _out: &mut Outbound<'_>) {}

    /// `OK+CONN` empfangen
    fn on_connected(&mut self, _out: &mut Outbound<'_>) {}

    /// `OK+LOST` empfangen
    fn on_disconnected(&mut self, _out: &mut Outbound<'_>) {}

    /// Wird am Ende jedes Schritts aufgerufen
    fn produce_outgoing(&mut self, _out: &mut Outbound<'_>) {}

    /// Wird am Anfang jedes Schritts aufgerufen
    fn periodic_work(&mut self, _out: &mut Outbound<'_>) {}
}

/// Trait für SmartLED Hardware-Zugriff (Status-LED)
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt eine RGB-Farbe auf die LED
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;
}
