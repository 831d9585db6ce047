//! Mocks für die Host-Tests
//!
//! Alle Kollaborateure des Controllers als in-memory Implementierungen.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use hm10_core::{
    ControllerHandler, LedError, MemoryStorage, Monotonic, Outbound, PersistentStorage,
    SmartLedWriter, StorageError, Transport, TransportError,
};
use rgb::RGB8;

// ============================================================================
// Mock Transport
// ============================================================================

#[derive(Default)]
pub struct MockTransport {
    pub incoming: VecDeque<u8>,
    pub written: Vec<u8>,
    pub closed: bool,
    pub fail_writes: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simuliert neu im UART-Puffer eingetroffene Bytes
    pub fn push_input(&mut self, input: &str) {
        self.incoming.extend(input.as_bytes());
    }

    pub fn written_str(&self) -> &str {
        std::str::from_utf8(&self.written).unwrap()
    }

    pub fn take_written(&mut self) -> String {
        String::from_utf8(std::mem::take(&mut self.written)).unwrap()
    }
}

impl Transport for MockTransport {
    fn read_byte(&mut self) -> Option<u8> {
        self.incoming.pop_front()
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.fail_writes {
            return Err(TransportError::WriteFailed);
        }
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        !self.closed
    }
}

// ============================================================================
// Manuelle Zeitquelle
// ============================================================================

/// Sekunden seit Boot, von außen verstellbar (auch nach dem Move in den Controller)
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<u32>>);

impl ManualClock {
    pub fn new(elapsed: u32) -> Self {
        Self(Rc::new(Cell::new(elapsed)))
    }

    pub fn set(&self, elapsed: u32) {
        self.0.set(elapsed);
    }

    pub fn advance(&self, secs: u32) {
        self.0.set(self.0.get() + secs);
    }
}

impl Monotonic for ManualClock {
    fn elapsed_secs(&self) -> u32 {
        self.0.get()
    }
}

// ============================================================================
// Aufzeichnender Handler
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerEvent {
    Incoming(String, String),
    Sync(String),
    AlarmFired(String),
    Connected,
    Disconnected,
    PeriodicWork,
    ProduceOutgoing,
}

impl HandlerEvent {
    pub fn incoming(variable: &str, value: &str) -> Self {
        HandlerEvent::Incoming(variable.to_owned(), value.to_owned())
    }
}

#[derive(Default)]
pub struct RecordingHandler {
    pub events: Vec<HandlerEvent>,
    /// Antwortet auf `Sync=<var>#` mit `<var>=1#`
    pub answer_sync: bool,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nur die Protokoll-Events, ohne periodic_work / produce_outgoing
    pub fn protocol_events(&self) -> Vec<HandlerEvent> {
        self.events
            .iter()
            .filter(|e| !matches!(e, HandlerEvent::PeriodicWork | HandlerEvent::ProduceOutgoing))
            .cloned()
            .collect()
    }

    pub fn fired_alarms(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HandlerEvent::AlarmFired(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ControllerHandler for RecordingHandler {
    fn on_incoming_message(&mut self, variable: &str, value: &str, _out: &mut Outbound<'_>) {
        self.events.push(HandlerEvent::incoming(variable, value));
    }

    fn on_sync(&mut self, variable: &str, out: &mut Outbound<'_>) {
        self.events.push(HandlerEvent::Sync(variable.to_owned()));
        if self.answer_sync {
            out.write_int(variable, 1).unwrap();
        }
    }

    fn on_alarm_fired(&mut self, id: &str, _out: &mut Outbound<'_>) {
        self.events.push(HandlerEvent::AlarmFired(id.to_owned()));
    }

    fn on_connected(&mut self, _out: &mut Outbound<'_>) {
        self.events.push(HandlerEvent::Connected);
    }

    fn on_disconnected(&mut self, _out: &mut Outbound<'_>) {
        self.events.push(HandlerEvent::Disconnected);
    }

    fn produce_outgoing(&mut self, _out: &mut Outbound<'_>) {
        self.events.push(HandlerEvent::ProduceOutgoing);
    }

    fn periodic_work(&mut self, _out: &mut Outbound<'_>) {
        self.events.push(HandlerEvent::PeriodicWork);
    }
}

// ============================================================================
// Speicher mit Fehler-Injektion
// ============================================================================

/// `MemoryStorage` dessen Schreibzugriffe auf Wunsch fehlschlagen
#[derive(Clone, Default)]
pub struct FlakyStorage {
    pub inner: MemoryStorage,
    pub fail_writes: bool,
}

impl PersistentStorage for FlakyStorage {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        self.inner.read(offset, buf)
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed);
        }
        self.inner.write(offset, bytes)
    }
}

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_color: Option<RGB8>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_color = Some(color);
        self.write_count += 1;
        Ok(())
    }
}
