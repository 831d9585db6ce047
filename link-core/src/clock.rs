//! Wanduhr aus Host-Anker und monotoner Zeit
//!
//! Der Host schickt einmal pro Verbindung `$Time$=<epoch>#`. Daraus wird der
//! Anker `epoch - elapsed` berechnet; `now()` ist danach `anker + elapsed`.

use crate::traits::Monotonic;

/// Rückgabewert von `now()` solange kein `$Time$` empfangen wurde
pub const UNSYNCHRONIZED: u32 = 0;

pub struct Clock<M: Monotonic> {
    source: M,
    anchor: u32,
}

impl<M: Monotonic> Clock<M> {
    pub fn new(source: M) -> Self {
        Self {
            source,
            anchor: UNSYNCHRONIZED,
        }
    }

    /// Sekunden seit 1970 oder `UNSYNCHRONIZED`
    pub fn now(&self) -> u32 {
        if self.anchor == UNSYNCHRONIZED {
            return UNSYNCHRONIZED;
        }
        self.anchor.wrapping_add(self.source.elapsed_secs())
    }

    /// Setzt den Anker so, dass `now()` ab sofort `epoch_secs` liefert
    pub fn sync(&mut self, epoch_secs: u32) {
        self.anchor = epoch_secs.wrapping_sub(self.source.elapsed_secs());
    }

    pub fn is_synchronized(&self) -> bool {
        self.anchor != UNSYNCHRONIZED
    }

    pub fn anchor(&self) -> u32 {
        self.anchor
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.source.elapsed_secs()
    }

    pub fn source(&self) -> &M {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut M {
        &mut self.source
    }
}
