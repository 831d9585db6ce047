//! Kalender-Zerlegung von Unix-Zeitstempeln
//!
//! Reine Arithmetik ohne Zustand: UTC, keine Schaltsekunden,
//! Gregorianische Schaltjahr-Regel.
//!
//! Die Datumsberechnung nutzt Howard Hinnant's `civil_from_days`
//! (O(1), keine Schleife über Jahre).
//! Referenz: http://howardhinnant.github.io/date_algorithms.html

use core::fmt;

const SECONDS_PER_DAY: u32 = 86_400;

/// Zerlegter Zeitpunkt
///
/// `weekday` zählt ab Sonntag = 1, `month` und `day` beginnen bei 1,
/// `year` ist absolut (nicht relativ zu 1970).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrokenTime {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub weekday: u8,
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// Schaltjahr nach Gregorianischem Kalender
///
/// - teilbar durch 4: Schaltjahr
/// - AUSSER teilbar durch 100: kein Schaltjahr
/// - AUSSER teilbar durch 400: Schaltjahr
pub fn is_leap_year(year: u16) -> bool {
    (year.is_multiple_of(4) && !year.is_multiple_of(100)) || year.is_multiple_of(400)
}

/// Zerlegt Sekunden seit 1970-01-01 in Kalender-Komponenten
///
/// # Beispiele
///
/// ```
/// # use hm10_core::break_time;
/// let t = break_time(0);
/// assert_eq!((t.year, t.month, t.day), (1970, 1, 1));
/// assert_eq!(t.weekday, 5); // Donnerstag
/// ```
pub fn break_time(epoch_secs: u32) -> BrokenTime {
    let days = epoch_secs / SECONDS_PER_DAY;
    let secs_today = epoch_secs % SECONDS_PER_DAY;

    let (year, month, day) = civil_from_days(days);

    BrokenTime {
        seconds: (secs_today % 60) as u8,
        minutes: ((secs_today / 60) % 60) as u8,
        hours: (secs_today / 3600) as u8,
        // 1970-01-01 war ein Donnerstag
        weekday: ((days + 4) % 7 + 1) as u8,
        year,
        month,
        day,
    }
}

/// Tage seit 1970-01-01 → (Jahr, Monat, Tag)
fn civil_from_days(days_since_epoch: u32) -> (u16, u8, u8) {
    // Epoche auf 0000-03-01 verschieben, der Schalttag liegt dann am Jahresende
    let z = days_since_epoch + 719_468;

    // Nur nicht-negative Tage, daher keine Ära-Korrektur
    let era = z / 146_097;
    let doe = z - era * 146_097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365; // [0, 399]
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11], 0 = März

    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = yoe + era * 400 + u32::from(month <= 2);

    (year as u16, month, day)
}

impl fmt::Display for BrokenTime {
    /// `T/M/JJJJ h:m:s`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} {}:{}:{}",
            self.day, self.month, self.year, self.hours, self.minutes, self.seconds
        )
    }
}
