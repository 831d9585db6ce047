// Speicher-Layout eines Alarms
//
// Ein Slot ist 16 Bytes groß:
//   [0..11)  ID-Feld: Prefix 'A', bis zu 9 ID-Bytes, NUL-Terminator
//   [11..15) Fälligkeit, Sekunden seit 1970, little-endian
//   [15]     Wiederholung (0 = einmalig)
//
// "A\0" markiert einen leeren Slot. Ein fehlender Prefix bedeutet
// ungelöschten / uninitialisierten Speicher.

use heapless::String;

/// Anzahl der Alarm-Slots
pub const ALARM_SLOTS: usize = 5;

pub const ALARM_ID_FIELD_LEN: usize = 11;

/// Maximale ID-Länge ohne Prefix und Terminator
pub const ALARM_ID_MAX_LEN: usize = ALARM_ID_FIELD_LEN - 2;

pub const ALARM_RECORD_LEN: usize = ALARM_ID_FIELD_LEN + 4 + 1;

/// Größe der kompletten Tabelle im Speicher
pub const ALARM_TABLE_LEN: usize = ALARM_SLOTS * ALARM_RECORD_LEN;

pub const ALARM_ID_PREFIX: u8 = b'A';

/// Wiederholende Alarme feuern exakt 24h später erneut (ohne Sommerzeit)
pub const REPEAT_INTERVAL_SECS: u32 = 86_400;

const DUE_OFFSET: usize = ALARM_ID_FIELD_LEN;
const REPEAT_OFFSET: usize = DUE_OFFSET + 4;

pub type AlarmId = String<ALARM_ID_MAX_LEN>;

/// Kürzt `raw` auf `ALARM_ID_MAX_LEN` Bytes (an einer Zeichengrenze)
///
/// NUL beendet die ID, da es im Speicher der Terminator ist.
pub fn alarm_id(raw: &str) -> AlarmId {
    let mut id = AlarmId::new();
    for c in raw.chars().take_while(|&c| c != '\0') {
        if id.push(c).is_err() {
            break;
        }
    }
    id
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alarm {
    pub id: AlarmId,
    /// Sekunden seit 1970
    pub due: u32,
    pub repeat: bool,
}

impl Alarm {
    pub fn new(id: &str, due: u32, repeat: bool) -> Self {
        Self {
            id: alarm_id(id),
            due,
            repeat,
        }
    }

    pub(crate) fn encode(&self) -> [u8; ALARM_RECORD_LEN] {
        let mut record = empty_record();
        let id = self.id.as_bytes();
        record[1..1 + id.len()].copy_from_slice(id);
        record[DUE_OFFSET..REPEAT_OFFSET].copy_from_slice(&self.due.to_le_bytes());
        record[REPEAT_OFFSET] = u8::from(self.repeat);
        record
    }
}

/// Dekodierter Slot-Inhalt
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Kein Prefix: Speicher wurde nie initialisiert
    Uninitialized,
    Empty,
    Occupied(Alarm),
}

impl Slot {
    pub(crate) fn decode(record: &[u8; ALARM_RECORD_LEN]) -> Self {
        if record[0] != ALARM_ID_PREFIX {
            return Slot::Uninitialized;
        }

        let field = &record[1..ALARM_ID_FIELD_LEN];
        let len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        if len == 0 {
            return Slot::Empty;
        }

        let raw = &field[..len.min(ALARM_ID_MAX_LEN)];
        let mut due = [0u8; 4];
        due.copy_from_slice(&record[DUE_OFFSET..REPEAT_OFFSET]);

        // Ungültiges UTF-8 am Anfang ergibt keine ID: wie Müll behandeln
        let id = alarm_id(crate::types::utf8_prefix(raw));
        if id.is_empty() {
            return Slot::Uninitialized;
        }

        Slot::Occupied(Alarm {
            id,
            due: u32::from_le_bytes(due),
            repeat: record[REPEAT_OFFSET] != 0,
        })
    }

    pub(crate) fn into_alarm(self) -> Option<Alarm> {
        match self {
            Slot::Occupied(alarm) => Some(alarm),
            _ => None,
        }
    }
}

/// Leerer Slot: ID "A", Fälligkeit 0, einmalig
pub(crate) fn empty_record() -> [u8; ALARM_RECORD_LEN] {
    let mut record = [0u8; ALARM_RECORD_LEN];
    record[0] = ALARM_ID_PREFIX;
    record
}

#[cfg(feature = "defmt")]
impl defmt::Format for Alarm {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Alarm {{ id: {}, due: {}, repeat: {} }}",
            self.id.as_str(),
            self.due,
            self.repeat
        )
    }
}
