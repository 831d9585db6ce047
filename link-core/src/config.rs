//! Controller-Konfiguration

/// Mindestabstand zwischen zwei Alarm-Prüfungen in Sekunden
pub const DEFAULT_ALARM_CHECK_INTERVAL_SECS: u32 = 60;

/// Umgang mit mehreren vollständigen Nachrichten in einem Poll
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrainPolicy {
    /// Alle verfügbaren Bytes lesen, nur die letzte Nachricht zählt.
    /// Frühere Nachrichten desselben Polls gehen verloren.
    #[default]
    LatestWins,
    /// Nach der ersten vollständigen Nachricht aufhören; der Rest bleibt
    /// im Transport und wird im nächsten Schritt gelesen.
    OnePerStep,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    pub alarm_check_interval_secs: u32,
    pub drain_policy: DrainPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            alarm_check_interval_secs: DEFAULT_ALARM_CHECK_INTERVAL_SECS,
            drain_policy: DrainPolicy::LatestWins,
        }
    }
}

impl ControllerConfig {
    pub fn with_alarm_check_interval(mut self, secs: u32) -> Self {
        self.alarm_check_interval_secs = secs;
        self
    }

    pub fn with_drain_policy(mut self, policy: DrainPolicy) -> Self {
        self.drain_policy = policy;
        self
    }
}
