// UART Transport zum HM-10 Modul
//
// Das Modul hängt transparent an UART1: alles was die App per BLE schickt,
// kommt hier als Bytes an, inklusive der Statusmeldungen OK+CONN / OK+LOST.

use esp_hal::Blocking;
use esp_hal::uart::{Config as UartConfig, ConfigError, Uart};
use hm10_core::{Transport, TransportError};

use crate::config::HM10_BAUD_RATE;

pub struct UartTransport {
    uart: Uart<'static, Blocking>,
}

impl UartTransport {
    /// Initialisiert UART1 mit der Baudrate des HM-10
    pub fn new(
        uart1: esp_hal::peripherals::UART1<'static>,
        tx: esp_hal::peripherals::GPIO4<'static>,
        rx: esp_hal::peripherals::GPIO5<'static>,
    ) -> Result<Self, ConfigError> {
        let config = UartConfig::default().with_baudrate(HM10_BAUD_RATE);
        let uart = Uart::new(uart1, config)?.with_tx(tx).with_rx(rx);
        Ok(Self { uart })
    }
}

impl Transport for UartTransport {
    fn read_byte(&mut self) -> Option<u8> {
        // read() blockiert ohne Daten, daher vorher prüfen
        if !self.uart.read_ready() {
            return None;
        }

        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(e) => {
                defmt::warn!("UART: read error {}", defmt::Debug2Format(&e));
                None
            }
        }
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), TransportError> {
        while !bytes.is_empty() {
            let written = self
                .uart
                .write(bytes)
                .map_err(|_| TransportError::WriteFailed)?;
            bytes = &bytes[written..];
        }
        self.uart.flush().map_err(|_| TransportError::WriteFailed)
    }
}
