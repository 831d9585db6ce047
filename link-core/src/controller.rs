//! Protokoll-Controller
//!
//! Ein `step()` pro Host-Takt, immer in derselben Reihenfolge:
//!
//! 1. Alarm-Prüfung (rate-limitiert)
//! 2. `periodic_work`
//! 3. Eingang lesen und die Nachricht verarbeiten
//! 4. Alarm-Prüfung erneut (ein während des Dispatch fälliger Alarm
//!    feuert so noch im selben Schritt)
//! 5. `produce_outgoing`
//!
//! Ein `Sync` beendet den Schritt nach Schritt 3. Kein Fehler verlässt `step()`:
//! fehlerhafte Nachrichten werden verworfen, Speicherfehler nur geloggt.

use crate::alarms::{AlarmId, AlarmScheduler, AlarmStore, alarm_id};
use crate::calendar::break_time;
use crate::clock::Clock;
use crate::config::{ControllerConfig, DrainPolicy};
use crate::framer::MessageFramer;
use crate::logic::{parse_flag, parse_u32};
use crate::outbound::Outbound;
use crate::storage::NoStorage;
use crate::traits::{ControllerHandler, Monotonic, PersistentStorage, StorageError, Transport};
use crate::types::{
    ALARM_ID_VARIABLE, ALARM_REPEAT_VARIABLE, ALARM_TIME_VARIABLE, FramerEvent, Message,
    SYNC_VARIABLE, TIME_VARIABLE, is_reserved,
};

/// Über mehrere Nachrichten gesammelte Alarm-Anfrage
///
/// Der Host schickt `$AlarmId$`, `$AlarmT$` und `$AlarmR$` nacheinander,
/// erst `$AlarmR$` schreibt in die Tabelle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingAlarm {
    pub id: AlarmId,
    /// `Some(0)` bedeutet löschen
    pub due: Option<u32>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

pub struct Controller<T, M, H, S = NoStorage>
where
    T: Transport,
    M: Monotonic,
    H: ControllerHandler,
    S: PersistentStorage,
{
    transport: T,
    clock: Clock<M>,
    framer: MessageFramer,
    handler: H,
    alarms: Option<AlarmScheduler<S>>,
    pending: PendingAlarm,
    last_alarm_check: u32,
    config: ControllerConfig,
}

impl<T, M, H> Controller<T, M, H, NoStorage>
where
    T: Transport,
    M: Monotonic,
    H: ControllerHandler,
{
    /// Controller ohne Alarm-Unterstützung
    ///
    /// `$Time$` stellt trotzdem die Uhr, Alarm-Nachrichten werden verworfen.
    pub fn new(transport: T, monotonic: M, handler: H, config: ControllerConfig) -> Self {
        Self::build(transport, monotonic, handler, None, config)
    }
}

impl<T, M, H, S> Controller<T, M, H, S>
where
    T: Transport,
    M: Monotonic,
    H: ControllerHandler,
    S: PersistentStorage,
{
    /// Controller mit persistenter Alarm-Tabelle in `storage`
    ///
    /// Uninitialisierte Slots werden dabei zurückgesetzt.
    pub fn with_alarms(
        transport: T,
        monotonic: M,
        storage: S,
        handler: H,
        config: ControllerConfig,
    ) -> Result<Self, StorageError> {
        let store = AlarmStore::new(storage)?;
        Ok(Self::with_store(transport, monotonic, store, handler, config))
    }

    /// Controller mit einer bereits geöffneten Alarm-Tabelle
    ///
    /// Erlaubt dem Aufrufer, bei einem Fehler in `AlarmStore::new` auf
    /// `Controller::new` auszuweichen, ohne Transport und Handler zu verlieren.
    pub fn with_store(
        transport: T,
        monotonic: M,
        store: AlarmStore<S>,
        handler: H,
        config: ControllerConfig,
    ) -> Self {
        Self::build(
            transport,
            monotonic,
            handler,
            Some(AlarmScheduler::new(store)),
            config,
        )
    }

    fn build(
        transport: T,
        monotonic: M,
        handler: H,
        alarms: Option<AlarmScheduler<S>>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            transport,
            clock: Clock::new(monotonic),
            framer: MessageFramer::new(),
            handler,
            alarms,
            pending: PendingAlarm::default(),
            last_alarm_check: 0,
            config,
        }
    }

    /// Ein Durchlauf der Hauptschleife
    pub fn step(&mut self) {
        self.check_alarms();

        self.handler
            .periodic_work(&mut Outbound::new(&mut self.transport));

        if let Some(message) = self.drain() {
            if self.dispatch(&message) == Flow::Stop {
                return;
            }
        }

        self.check_alarms();

        self.handler
            .produce_outgoing(&mut Outbound::new(&mut self.transport));
    }

    /// Sekunden seit 1970, 0 solange nicht synchronisiert
    pub fn now(&self) -> u32 {
        self.clock.now()
    }

    pub fn clock(&self) -> &Clock<M> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock<M> {
        &mut self.clock
    }

    pub fn framer(&self) -> &MessageFramer {
        &self.framer
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Writer für Nachrichten außerhalb der Callbacks
    pub fn outbound(&mut self) -> Outbound<'_> {
        Outbound::new(&mut self.transport)
    }

    /// Alarm-Tabelle, `None` ohne Alarm-Unterstützung
    pub fn alarms(&mut self) -> Option<&mut AlarmStore<S>> {
        self.alarms.as_mut().map(AlarmScheduler::store_mut)
    }

    pub fn pending_alarm(&self) -> &PendingAlarm {
        &self.pending
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Liest alle verfügbaren Bytes, Statusmeldungen gehen sofort an den Handler
    fn drain(&mut self) -> Option<Message> {
        let mut latest: Option<Message> = None;

        while let Some(byte) = self.transport.read_byte() {
            match self.framer.feed(byte) {
                Some(FramerEvent::Connected) => {
                    info!("link connected");
                    self.handler
                        .on_connected(&mut Outbound::new(&mut self.transport));
                }
                Some(FramerEvent::Disconnected) => {
                    info!("link lost");
                    self.handler
                        .on_disconnected(&mut Outbound::new(&mut self.transport));
                }
                Some(FramerEvent::Message(message)) => {
                    if let Some(dropped) = latest.replace(message) {
                        debug!("superseded in same poll: {}", dropped.variable());
                    }
                    if self.config.drain_policy == DrainPolicy::OnePerStep {
                        break;
                    }
                }
                None => {}
            }
        }

        latest
    }

    fn dispatch(&mut self, message: &Message) -> Flow {
        let variable = message.variable();
        let value = message.value();
        trace!("received {}={}", variable, value);

        if variable == SYNC_VARIABLE && !value.is_empty() {
            self.handler
                .on_sync(value, &mut Outbound::new(&mut self.transport));
            return Flow::Stop;
        }

        match variable {
            ALARM_ID_VARIABLE => {
                if !value.is_empty() {
                    self.pending.id = alarm_id(value);
                }
            }
            ALARM_TIME_VARIABLE => match parse_u32(value) {
                Some(due) => self.pending.due = Some(due),
                None => debug!("ignoring malformed alarm time {}", value),
            },
            ALARM_REPEAT_VARIABLE => {
                if !value.is_empty() {
                    self.commit_alarm(value);
                }
            }
            TIME_VARIABLE => match parse_u32(value) {
                Some(epoch) => {
                    self.clock.sync(epoch);
                    info!("time synchronized: {}", break_time(epoch));
                }
                None => debug!("ignoring malformed time {}", value),
            },
            // z.B. `Sync` ohne Wert
            _ if is_reserved(variable) => {}
            _ if !variable.is_empty() && !value.is_empty() => {
                self.handler.on_incoming_message(
                    variable,
                    value,
                    &mut Outbound::new(&mut self.transport),
                );
            }
            _ => {}
        }

        Flow::Continue
    }

    fn commit_alarm(&mut self, repeat: &str) {
        let Some(scheduler) = self.alarms.as_mut() else {
            debug!("alarm support disabled, ignoring request");
            return;
        };
        let Some(due) = self.pending.due else {
            debug!("alarm commit without time");
            return;
        };
        if self.pending.id.is_empty() {
            debug!("alarm commit without id");
            return;
        }

        let store = scheduler.store_mut();
        let id = self.pending.id.as_str();

        let result = if due == 0 {
            store.remove(id).map(|removed| {
                if removed {
                    info!("alarm {} removed", id);
                }
            })
        } else {
            let Some(repeat) = parse_flag(repeat) else {
                debug!("ignoring malformed repeat flag {}", repeat);
                return;
            };
            store.create_or_update(id, due, repeat).map(|slot| {
                if let Some(slot) = slot {
                    info!("alarm {} stored in slot {}", id, slot);
                }
            })
        };

        if let Err(e) = result {
            warn!("alarm storage failed: {}", e);
        }

        if let Ok(alarms) = store.alarms() {
            for (index, alarm) in &alarms {
                debug!("slot {}: {}", index, alarm);
            }
        }

        self.pending = PendingAlarm::default();
    }

    fn check_alarms(&mut self) {
        let Some(scheduler) = self.alarms.as_mut() else {
            return;
        };

        let now = self.clock.now();
        if now.wrapping_sub(self.last_alarm_check) <= self.config.alarm_check_interval_secs {
            return;
        }
        self.last_alarm_check = now;

        let handler = &mut self.handler;
        let transport = &mut self.transport;
        let result = scheduler.scan(now, |id| {
            info!("alarm {} fired", id);
            handler.on_alarm_fired(id, &mut Outbound::new(&mut *transport));
        });

        if let Err(e) = result {
            warn!("alarm scan failed: {}", e);
        }
    }
}
