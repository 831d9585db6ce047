// Demo-Anwendung auf dem HM-10 Controller
//
// - Meldet die Uptime unter `Uptime` (periodisch und auf `Sync=Uptime#`)
// - Spiegelt den Verbindungsstatus und gefeuerte Alarme auf die Status-LED
// - Loggt alle übrigen Nachrichten

use core::fmt::Write as _;

use defmt::{info, warn};
use heapless::String;
use hm10_core::{ControllerHandler, LinkStatus, Monotonic, Outbound, VALUE_LEN};

use crate::StatusSender;
use crate::config::{UPTIME_PUBLISH_SECS, UPTIME_VARIABLE};
use crate::hal::EmbassyUptime;

pub struct DemoHandler {
    status: StatusSender,
    uptime: EmbassyUptime,
    last_published: Option<u32>,
}

impl DemoHandler {
    pub fn new(status: StatusSender) -> Self {
        Self {
            status,
            uptime: EmbassyUptime,
            last_published: None,
        }
    }

    fn publish_status(&self, status: LinkStatus) {
        if self.status.try_send(status).is_err() {
            warn!("Status channel full, dropping {}", status);
        }
    }

    fn write_uptime(&mut self, out: &mut Outbound<'_>) {
        let secs = self.uptime.elapsed_secs();
        let value = i32::try_from(secs).unwrap_or(i32::MAX);
        if out.write_int(UPTIME_VARIABLE, value).is_err() {
            warn!("UART: uptime not sent");
        }
        self.last_published = Some(secs);
    }
}

impl ControllerHandler for DemoHandler {
    fn on_incoming_message(&mut self, variable: &str, value: &str, _out: &mut Outbound<'_>) {
        info!("App: {}={}", variable, value);
    }

    fn on_sync(&mut self, variable: &str, out: &mut Outbound<'_>) {
        if variable == UPTIME_VARIABLE {
            self.write_uptime(out);
        } else {
            info!("App: no value for Sync={}", variable);
        }
    }

    fn on_alarm_fired(&mut self, id: &str, out: &mut Outbound<'_>) {
        self.publish_status(LinkStatus::AlarmFired);

        let mut text: String<VALUE_LEN> = String::new();
        let _ = write!(text, "alarm {} fired", id);
        let _ = out.log_ln(&text);
    }

    fn on_connected(&mut self, out: &mut Outbound<'_>) {
        self.publish_status(LinkStatus::Connected);
        let _ = out.log_ln("hm10-link ready");
    }

    fn on_disconnected(&mut self, _out: &mut Outbound<'_>) {
        self.publish_status(LinkStatus::Disconnected);
    }

    fn produce_outgoing(&mut self, out: &mut Outbound<'_>) {
        let now = self.uptime.elapsed_secs();
        let due = match self.last_published {
            Some(last) => now.wrapping_sub(last) >= UPTIME_PUBLISH_SECS,
            None => true,
        };
        if due {
            self.write_uptime(out);
        }
    }
}
