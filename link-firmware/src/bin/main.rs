// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use hm10_link::app::DemoHandler;
use hm10_link::config::{ALARM_CHECK_INTERVAL_SECS, ALARM_FLASH_OFFSET};
use hm10_link::hal::{EmbassyUptime, FlashAlarmStorage, UartTransport};
use hm10_link::tasks::{basic_controller_task, controller_task, status_led_task};
use hm10_link::{
    AlarmStore, BasicController, Controller, ControllerConfig, LinkController, StatusChannel,
};

// Logging
use defmt::warn;

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert UART, Flash und LED, startet Embassy Runtime und spawnt Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // HM-10 an UART1 (GPIO4 = TX, GPIO5 = RX)
    let transport = UartTransport::new(peripherals.UART1, peripherals.GPIO4, peripherals.GPIO5)
        .expect("Failed to initialize UART1");

    // Alarm-Tabelle im Flash
    let storage = FlashAlarmStorage::new(peripherals.FLASH, ALARM_FLASH_OFFSET);

    // Status-Channel erstellen (Controller → LED Task)
    static STATUS_CHANNEL: static_cell::StaticCell<StatusChannel> = static_cell::StaticCell::new();
    let status_channel = &*STATUS_CHANNEL.init(StatusChannel::new());

    let handler = DemoHandler::new(status_channel.sender());
    let controller_config =
        ControllerConfig::default().with_alarm_check_interval(ALARM_CHECK_INTERVAL_SECS);

    // Spawn Status-LED Task
    spawner
        .spawn(status_led_task(
            peripherals.GPIO8,
            peripherals.RMT,
            status_channel.receiver(),
        ))
        .unwrap();

    // Spawn Controller Task, ohne lesbaren Flash weiter ohne Alarme
    match AlarmStore::new(storage) {
        Ok(store) => {
            let controller: LinkController = Controller::with_store(
                transport,
                EmbassyUptime,
                store,
                handler,
                controller_config,
            );
            spawner.spawn(controller_task(controller)).unwrap();
        }
        Err(e) => {
            warn!("Alarm table unavailable ({}), alarms disabled", e);
            let controller: BasicController =
                Controller::new(transport, EmbassyUptime, handler, controller_config);
            spawner.spawn(basic_controller_task(controller)).unwrap();
        }
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
