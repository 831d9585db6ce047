// Controller Task - Hauptschleife des HM-10 Protokolls
use embassy_time::{Duration, Timer};
use hm10_core::{Controller, ControllerHandler, Monotonic, PersistentStorage, Transport};

use crate::config::LOOP_DELAY_MS;
use crate::{BasicController, LinkController};

/// Ruft `step()` im festen Takt auf
///
/// `step()` selbst blockiert nie: ohne neue Bytes kehrt es sofort zurück.
async fn run_controller<T, M, H, S>(mut controller: Controller<T, M, H, S>) -> !
where
    T: Transport,
    M: Monotonic,
    H: ControllerHandler,
    S: PersistentStorage,
{
    loop {
        controller.step();
        Timer::after(Duration::from_millis(LOOP_DELAY_MS)).await;
    }
}

/// Controller mit Alarm-Tabelle im Flash
#[embassy_executor::task]
pub async fn controller_task(controller: LinkController) {
    defmt::info!("Controller: started");
    run_controller(controller).await
}

/// Controller ohne Alarme (Flash nicht lesbar)
#[embassy_executor::task]
pub async fn basic_controller_task(controller: BasicController) {
    defmt::warn!("Controller: started without alarms");
    run_controller(controller).await
}
