// Status-LED Task - zeigt den Link-Status über die RGB LED
use defmt::{error, info};
use esp_hal_smartled::smart_led_buffer;

use crate::config::{LED_BRIGHTNESS, RMT_CLOCK_MHZ};
use crate::hal::RmtLedWriter;
use crate::{LinkStatus, SmartLedWriter, StatusReceiver, status_color};

/// Status-LED Logic - ohne Hardware-Abhängigkeit
///
/// Startet rot (getrennt) und setzt bei jeder Status-Änderung die Farbe
/// aus `status_color()`.
///
/// # Parameter
/// - `led`: LED Writer (Hardware oder Mock)
/// - `status_receiver`: Channel Receiver für Status-Änderungen
pub async fn status_led_logic<L: SmartLedWriter>(mut led: L, status_receiver: StatusReceiver) {
    let mut status = LinkStatus::Disconnected;

    loop {
        if led.write(status_color(status, LED_BRIGHTNESS)).is_err() {
            error!("Failed to write to LED");
        }

        status = status_receiver.receive().await;
        info!("Status: {}", status);
    }
}

/// Status-LED Task - Embassy Task für parallele Ausführung
///
/// # Parameter
/// - `gpio8`: GPIO8 Peripheral für LED-Datenleitung
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `status_receiver`: Channel Receiver für Status-Änderungen
#[embassy_executor::task]
pub async fn status_led_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    status_receiver: StatusReceiver,
) {
    // Buffer für SmartLED Daten erstellen (1 LED)
    let mut rmt_buffer = smart_led_buffer!(1);

    match RmtLedWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(led) => status_led_logic(led, status_receiver).await,
        Err(_) => error!("RMT init failed, status LED disabled"),
    }
}
