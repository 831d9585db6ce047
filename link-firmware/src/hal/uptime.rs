// Monotone Zeitquelle aus dem Embassy-Timer

use embassy_time::Instant;
use hm10_core::Monotonic;

/// Sekunden seit Boot
#[derive(Clone, Copy, Default)]
pub struct EmbassyUptime;

impl Monotonic for EmbassyUptime {
    fn elapsed_secs(&self) -> u32 {
        // Überlauf erst nach ~136 Jahren
        Instant::now().as_secs() as u32
    }
}
