//! Ausgehende Nachrichten zum Host
//!
//! Formate (byte-genau):
//! - Ganzzahl:  `<variable>=<dezimal>#`
//! - Float:     `<variable>=<wert mit 3 Nachkommastellen>#`
//! - Tripel:    `<variable>=<x>:<y>:<z>#` (je 2 Nachkommastellen)
//! - Text:      `<variable>=<text>#`
//!
//! Ist der Transport nicht bereit, sind alle Schreibaufrufe No-ops.

use core::fmt::{self, Write as _};

use heapless::Vec;

use crate::traits::{Transport, TransportError};
use crate::types::{VALUE_LEN, VARIABLE_LEN};

/// Variable für Debug-Ausgaben ohne Zeilenumbruch
pub const DEBUG_VARIABLE: &str = "$D$";

/// Variable für Debug-Ausgaben mit Zeilenumbruch
pub const DEBUG_LINE_VARIABLE: &str = "$DLN$";

/// Puffer für formatierte Nachrichten: Variable + `=` + Wert + `#` + Reserve
const OUTBOUND_LEN: usize = VARIABLE_LEN + VALUE_LEN + 3;

pub struct Outbound<'a> {
    transport: &'a mut dyn Transport,
}

impl<'a> Outbound<'a> {
    pub fn new(transport: &'a mut dyn Transport) -> Self {
        Self { transport }
    }

    pub fn is_ready(&self) -> bool {
        self.transport.is_ready()
    }

    pub fn write_int(&mut self, variable: &str, value: i32) -> Result<(), TransportError> {
        self.send(variable, format_args!("{}", value))
    }

    pub fn write_float(&mut self, variable: &str, value: f32) -> Result<(), TransportError> {
        self.send(variable, format_args!("{:.3}", value))
    }

    pub fn write_triple(
        &mut self,
        variable: &str,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), TransportError> {
        self.send(variable, format_args!("{:.2}:{:.2}:{:.2}", x, y, z))
    }

    /// Text wird ohne Längenbegrenzung übertragen
    pub fn write_text(&mut self, variable: &str, text: &str) -> Result<(), TransportError> {
        if !self.transport.is_ready() {
            return Ok(());
        }
        self.transport.write_all(variable.as_bytes())?;
        self.transport.write_all(b"=")?;
        self.transport.write_all(text.as_bytes())?;
        self.transport.write_all(b"#")
    }

    /// Debug-Text an die App (`$D$=...#`)
    pub fn log(&mut self, text: &str) -> Result<(), TransportError> {
        self.write_text(DEBUG_VARIABLE, text)
    }

    /// Debug-Zeile an die App (`$DLN$=...#`)
    pub fn log_ln(&mut self, text: &str) -> Result<(), TransportError> {
        self.write_text(DEBUG_LINE_VARIABLE, text)
    }

    /// Zahl als Debug-Text (`$D$=<dezimal>#`)
    pub fn log_int(&mut self, value: i32) -> Result<(), TransportError> {
        self.send(DEBUG_VARIABLE, format_args!("{}", value))
    }

    /// Zahl als Debug-Zeile (`$DLN$=<dezimal>#`)
    pub fn log_ln_int(&mut self, value: i32) -> Result<(), TransportError> {
        self.send(DEBUG_LINE_VARIABLE, format_args!("{}", value))
    }

    fn send(&mut self, variable: &str, value: fmt::Arguments<'_>) -> Result<(), TransportError> {
        if !self.transport.is_ready() {
            return Ok(());
        }

        let mut buffer: Vec<u8, OUTBOUND_LEN> = Vec::new();
        {
            // Ein Byte für den Terminator freihalten
            let mut writer = Truncating {
                buffer: &mut buffer,
                limit: OUTBOUND_LEN - 1,
            };
            let _ = write!(writer, "{}={}", variable, value);
        }
        let _ = buffer.push(b'#');

        self.transport.write_all(&buffer)
    }
}

/// `fmt::Write` in einen festen Puffer, schneidet überzählige Bytes ab
struct Truncating<'b> {
    buffer: &'b mut Vec<u8, OUTBOUND_LEN>,
    limit: usize,
}

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            if self.buffer.len() >= self.limit {
                break;
            }
            let _ = self.buffer.push(byte);
        }
        Ok(())
    }
}
