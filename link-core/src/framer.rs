//! Inkrementeller Message Framer
//!
//! Zerlegt einen endlosen Byte-Strom in `variable=value#` Nachrichten und
//! erkennt parallel die HM-10 Statusmeldungen `OK+CONN` und `OK+LOST`.
//!
//! Der Zustand überlebt mehrere Polls: eine Nachricht, die über zwei
//! UART-Reads verteilt ankommt, wird trotzdem vollständig erkannt.
//!
//! Überlauf: Bytes jenseits von `VARIABLE_LEN` bzw. `VALUE_LEN` werden
//! verworfen, das Token endet trotzdem beim nächsten `=` bzw. `#`.

use core::mem;

use crate::types::{FramerEvent, Message};

/// Trennzeichen zwischen Variable und Wert
pub const VARIABLE_DELIMITER: u8 = b'=';

/// Abschluss jeder Nachricht
pub const MESSAGE_TERMINATOR: u8 = b'#';

/// Länge der Statusmeldungen des HM-10 Moduls
pub const SENTINEL_LEN: usize = 7;

pub const CONNECTED_TOKEN: &[u8; SENTINEL_LEN] = b"OK+CONN";
pub const DISCONNECTED_TOKEN: &[u8; SENTINEL_LEN] = b"OK+LOST";

// Nur die unteren SENTINEL_LEN Bits von `stored` sind relevant
const STORED_MASK: u8 = (1 << SENTINEL_LEN) - 1;

/// Welcher Teil der Nachricht gerade gelesen wird
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramerMode {
    Variable,
    Value,
}

#[derive(Clone, Debug)]
pub struct MessageFramer {
    mode: FramerMode,
    partial: Message,
    /// Die letzten rohen Bytes, rechtsbündig
    window: [u8; SENTINEL_LEN],
    window_len: usize,
    /// Bit i gesetzt: das i-letzte Byte steht im aktuellen Akkumulator
    stored: u8,
}

impl Default for MessageFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageFramer {
    pub fn new() -> Self {
        Self {
            mode: FramerMode::Variable,
            partial: Message::default(),
            window: [0; SENTINEL_LEN],
            window_len: 0,
            stored: 0,
        }
    }

    pub fn mode(&self) -> FramerMode {
        self.mode
    }

    /// Bisher gelesener, noch nicht abgeschlossener Teil
    pub fn partial(&self) -> &Message {
        &self.partial
    }

    /// Verwirft den kompletten Zustand (Akkumulatoren und Fenster)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Verarbeitet ein Byte
    ///
    /// Gibt `None` zurück solange weder eine Nachricht abgeschlossen
    /// noch eine Statusmeldung erkannt wurde.
    pub fn feed(&mut self, byte: u8) -> Option<FramerEvent> {
        self.push_window(byte);

        if let Some(event) = self.accumulate(byte) {
            return Some(event);
        }

        let event = if self.window_matches(CONNECTED_TOKEN) {
            FramerEvent::Connected
        } else if self.window_matches(DISCONNECTED_TOKEN) {
            FramerEvent::Disconnected
        } else {
            return None;
        };

        // Statusmeldung darf nicht im Variablennamen / Wert landen
        self.strip_sentinel();
        self.window = [0; SENTINEL_LEN];
        self.window_len = 0;
        Some(event)
    }

    /// Verarbeitet einen ganzen Puffer, Events werden lazy geliefert
    pub fn events<'a>(&'a mut self, bytes: &'a [u8]) -> impl Iterator<Item = FramerEvent> + 'a {
        bytes.iter().filter_map(move |&byte| self.feed(byte))
    }

    fn push_window(&mut self, byte: u8) {
        self.window.copy_within(1.., 0);
        self.window[SENTINEL_LEN - 1] = byte;
        self.window_len = (self.window_len + 1).min(SENTINEL_LEN);
    }

    fn window_matches(&self, token: &[u8; SENTINEL_LEN]) -> bool {
        self.window_len == SENTINEL_LEN && self.window == *token
    }

    fn accumulate(&mut self, byte: u8) -> Option<FramerEvent> {
        self.stored = (self.stored << 1) & STORED_MASK;

        match self.mode {
            FramerMode::Variable => {
                if byte == VARIABLE_DELIMITER {
                    self.mode = FramerMode::Value;
                    self.stored = 0;
                } else if byte != 0 && self.partial.push_variable(byte) {
                    self.stored |= 1;
                }
                None
            }
            FramerMode::Value => {
                if byte == MESSAGE_TERMINATOR {
                    let message = mem::take(&mut self.partial);
                    self.mode = FramerMode::Variable;
                    self.stored = 0;
                    return Some(FramerEvent::Message(message));
                }
                if self.partial.push_value(byte) {
                    self.stored |= 1;
                }
                None
            }
        }
    }

    fn strip_sentinel(&mut self) {
        // Gespeicherte Bytes liegen zusammenhängend am Ende des Akkumulators,
        // nach einem Überlauf wird nichts mehr angehängt
        let count = self.stored.count_ones() as usize;
        match self.mode {
            FramerMode::Variable => self.partial.pop_variable(count),
            FramerMode::Value => self.partial.pop_value(count),
        }
        self.stored = 0;
    }
}
