//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::types::LinkStatus;

/// Parst eine vorzeichenlose Dezimalzahl (Zeitstempel, Fälligkeit)
///
/// Umgebende Leerzeichen sind erlaubt, alles andere ergibt `None`.
pub fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Parst ein Wiederholungs-Flag
///
/// Ganzzahlen gelten wie in C als `!= 0`, zusätzlich `true` / `false`.
///
/// # Beispiele
///
/// ```
/// # use hm10_core::parse_flag;
/// assert_eq!(parse_flag("1"), Some(true));
/// assert_eq!(parse_flag("0"), Some(false));
/// assert_eq!(parse_flag("ja"), None);
/// ```
pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if let Ok(number) = value.parse::<i32>() {
        return Some(number != 0);
    }
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Farbe der Status-LED für einen Link-Zustand
///
/// Grün = verbunden, Rot = getrennt, Blau = Alarm gefeuert
pub fn status_color(status: LinkStatus, brightness: u8) -> RGB8 {
    match status {
        LinkStatus::Connected => RGB8 {
            r: 0,
            g: brightness,
            b: 0,
        },
        LinkStatus::Disconnected => RGB8 {
            r: brightness,
            g: 0,
            b: 0,
        },
        LinkStatus::AlarmFired => RGB8 {
            r: 0,
            g: 0,
            b: brightness,
        },
    }
}
