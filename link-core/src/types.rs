//! Core Types für das Nachrichten-Protokoll
//!
//! Datenstrukturen ohne Hardware-Dependencies

use heapless::Vec;

/// Maximale Länge eines Variablennamens in Bytes
pub const VARIABLE_LEN: usize = 16;

/// Maximale Länge eines Werts in Bytes
pub const VALUE_LEN: usize = 64;

// ============================================================================
// Reservierte Variablennamen
// ============================================================================
//
// Diese Nachrichten verarbeitet der Controller selbst, sie erreichen
// niemals `ControllerHandler::on_incoming_message`.

pub const SYNC_VARIABLE: &str = "Sync";
pub const TIME_VARIABLE: &str = "$Time$";
pub const ALARM_ID_VARIABLE: &str = "$AlarmId$";
pub const ALARM_TIME_VARIABLE: &str = "$AlarmT$";
pub const ALARM_REPEAT_VARIABLE: &str = "$AlarmR$";

/// Ist `variable` ein vom Protokoll reservierter Name?
pub fn is_reserved(variable: &str) -> bool {
    matches!(
        variable,
        SYNC_VARIABLE
            | TIME_VARIABLE
            | ALARM_ID_VARIABLE
            | ALARM_TIME_VARIABLE
            | ALARM_REPEAT_VARIABLE
    )
}

/// Längster gültiger UTF-8 Prefix von `bytes`
///
/// Abschneiden beim Überlauf kann eine Multi-Byte-Sequenz zerteilen,
/// der Rest wird dann verworfen.
pub fn utf8_prefix(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    }
}

// ============================================================================
// Message
// ============================================================================

/// Eine `variable=value` Nachricht mit festen Puffergrößen
///
/// Wird Byte für Byte vom `MessageFramer` aufgebaut und genau einmal
/// vom Controller verarbeitet.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Message {
    variable: Vec<u8, VARIABLE_LEN>,
    value: Vec<u8, VALUE_LEN>,
}

impl Message {
    /// Erstellt eine Nachricht, zu lange Teile werden abgeschnitten
    pub fn new(variable: &str, value: &str) -> Self {
        let mut message = Self::default();
        for &byte in variable.as_bytes() {
            message.push_variable(byte);
        }
        for &byte in value.as_bytes() {
            message.push_value(byte);
        }
        message
    }

    pub fn variable(&self) -> &str {
        utf8_prefix(&self.variable)
    }

    pub fn value(&self) -> &str {
        utf8_prefix(&self.value)
    }

    /// Gilt für `=#` und für eine frisch zurückgesetzte Nachricht
    pub fn is_empty(&self) -> bool {
        self.variable.is_empty() && self.value.is_empty()
    }

    /// Hängt ein Byte an den Variablennamen, `false` wenn der Puffer voll ist
    pub(crate) fn push_variable(&mut self, byte: u8) -> bool {
        self.variable.push(byte).is_ok()
    }

    /// Hängt ein Byte an den Wert, `false` wenn der Puffer voll ist
    pub(crate) fn push_value(&mut self, byte: u8) -> bool {
        self.value.push(byte).is_ok()
    }

    pub(crate) fn pop_variable(&mut self, count: usize) {
        let len = self.variable.len().saturating_sub(count);
        self.variable.truncate(len);
    }

    pub(crate) fn pop_value(&mut self, count: usize) {
        let len = self.value.len().saturating_sub(count);
        self.value.truncate(len);
    }
}

// ============================================================================
// Framer Events
// ============================================================================

/// Ergebnis eines `MessageFramer::feed` Aufrufs
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FramerEvent {
    /// `OK+CONN` erkannt
    Connected,
    /// `OK+LOST` erkannt
    Disconnected,
    /// `variable=value#` vollständig
    Message(Message),
}

// ============================================================================
// Link Status (für die Status-LED)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    Disconnected,
    Connected,
    AlarmFired,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Message {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Message {{ variable: {}, value: {} }}",
            self.variable(),
            self.value()
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FramerEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            FramerEvent::Connected => defmt::write!(fmt, "Connected"),
            FramerEvent::Disconnected => defmt::write!(fmt, "Disconnected"),
            FramerEvent::Message(message) => defmt::write!(fmt, "{}", message),
        }
    }
}
