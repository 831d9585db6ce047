//! Integration Tests für den Controller
//!
//! Simulieren den Host über MockTransport: Bytes einspeisen, `step()`,
//! danach die Handler-Events und geschriebenen Bytes prüfen.

use hm10_core::{
    Alarm, AlarmStore, Controller, ControllerConfig, DrainPolicy, MemoryStorage,
    PersistentStorage, StorageError,
};
use hm10_tests::{FlakyStorage, HandlerEvent, ManualClock, MockTransport, RecordingHandler};

type AlarmController<S = MemoryStorage> =
    Controller<MockTransport, ManualClock, RecordingHandler, S>;

const EPOCH: u32 = 1_700_000_000;

fn memory() -> MemoryStorage {
    MemoryStorage::new()
}

fn config(interval: u32) -> ControllerConfig {
    ControllerConfig::default().with_alarm_check_interval(interval)
}

fn controller_on<S: PersistentStorage>(
    clock: &ManualClock,
    storage: S,
    config: ControllerConfig,
) -> AlarmController<S> {
    Controller::with_alarms(
        MockTransport::new(),
        clock.clone(),
        storage,
        RecordingHandler::new(),
        config,
    )
    .unwrap()
}

fn controller(clock: &ManualClock) -> AlarmController {
    controller_on(clock, memory(), config(10))
}

fn send<S: PersistentStorage>(controller: &mut AlarmController<S>, input: &str) {
    controller.transport_mut().push_input(input);
    controller.step();
}

fn incoming(variable: &str, value: &str) -> HandlerEvent {
    HandlerEvent::incoming(variable, value)
}

// ============================================================================
// Tests: Dispatch
// ============================================================================

#[test]
fn test_message_is_forwarded() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    send(&mut controller, "Temp=21.5#");

    assert_eq!(
        controller.handler().events,
        vec![
            HandlerEvent::PeriodicWork,
            incoming("Temp", "21.5"),
            HandlerEvent::ProduceOutgoing
        ]
    );
}

#[test]
fn test_idle_step_runs_hooks() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    controller.step();

    assert_eq!(
        controller.handler().events,
        vec![HandlerEvent::PeriodicWork, HandlerEvent::ProduceOutgoing]
    );
}

#[test]
fn test_message_split_across_steps() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    send(&mut controller, "Temp=21.5#Hum");
    assert_eq!(
        controller.handler().protocol_events(),
        vec![incoming("Temp", "21.5")]
    );

    send(&mut controller, "idity=60#");
    assert_eq!(
        controller.handler().protocol_events(),
        vec![incoming("Temp", "21.5"), incoming("Humidity", "60")]
    );
}

#[test]
fn test_latest_message_wins_within_one_poll() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    send(&mut controller, "A=1#B=2#");

    assert_eq!(controller.handler().protocol_events(), vec![incoming("B", "2")]);
    assert!(controller.transport().incoming.is_empty());
}

#[test]
fn test_one_per_step_keeps_remaining_bytes() {
    let clock = ManualClock::new(0);
    let mut controller = controller_on(
        &clock,
        memory(),
        config(10).with_drain_policy(DrainPolicy::OnePerStep),
    );

    send(&mut controller, "A=1#B=2#");
    assert_eq!(controller.handler().protocol_events(), vec![incoming("A", "1")]);

    controller.step();
    assert_eq!(
        controller.handler().protocol_events(),
        vec![incoming("A", "1"), incoming("B", "2")]
    );
}

#[test]
fn test_empty_parts_are_not_forwarded() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    send(&mut controller, "Temp=#");
    send(&mut controller, "=5#");

    assert!(controller.handler().protocol_events().is_empty());
}

#[test]
fn test_sync_ends_step() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);
    controller.handler_mut().answer_sync = true;

    send(&mut controller, "Sync=Temp#");

    assert_eq!(
        controller.handler().events,
        vec![HandlerEvent::PeriodicWork, HandlerEvent::Sync("Temp".to_owned())]
    );
    assert_eq!(controller.transport().written_str(), "Temp=1#");
}

#[test]
fn test_sync_without_value_is_dropped() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    send(&mut controller, "Sync=#");

    assert_eq!(
        controller.handler().events,
        vec![HandlerEvent::PeriodicWork, HandlerEvent::ProduceOutgoing]
    );
}

#[test]
fn test_reserved_names_are_not_forwarded() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    for input in [
        "$Time$=1700000000#",
        "$AlarmId$=wake#",
        "$AlarmT$=1700000500#",
        "$AlarmR$=0#",
    ] {
        send(&mut controller, input);
    }

    assert!(controller.handler().protocol_events().is_empty());
}

#[test]
fn test_malformed_reserved_values_are_not_forwarded() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    for input in ["$Time$=soon#", "$AlarmT$=later#", "$AlarmR$=maybe#", "Sync=#"] {
        send(&mut controller, input);
    }

    assert!(controller.handler().protocol_events().is_empty());
}

#[test]
fn test_closed_transport_swallows_replies() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);
    controller.handler_mut().answer_sync = true;
    controller.transport_mut().closed = true;

    send(&mut controller, "Sync=Temp#");

    assert!(controller.transport().written.is_empty());
}

// ============================================================================
// Tests: Verbindungsstatus
// ============================================================================

#[test]
fn test_connection_tokens() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    send(&mut controller, "OK+CONNLed=1#");
    send(&mut controller, "OK+LOST");

    assert_eq!(
        controller.handler().protocol_events(),
        vec![
            HandlerEvent::Connected,
            incoming("Led", "1"),
            HandlerEvent::Disconnected
        ]
    );
}

// ============================================================================
// Tests: Zeit
// ============================================================================

#[test]
fn test_time_sync_sets_anchor() {
    let clock = ManualClock::new(100);
    let mut controller = controller(&clock);
    assert_eq!(controller.now(), 0);

    send(&mut controller, "$Time$=1700000000#");
    assert_eq!(controller.clock().anchor(), EPOCH - 100);
    assert_eq!(controller.now(), EPOCH);

    clock.set(250);
    assert_eq!(controller.now(), EPOCH + (250 - 100));
}

#[test]
fn test_malformed_time_is_ignored() {
    let clock = ManualClock::new(100);
    let mut controller = controller(&clock);

    send(&mut controller, "$Time$=soon#");

    assert!(!controller.clock().is_synchronized());
    assert_eq!(controller.now(), 0);
}

// ============================================================================
// Tests: Alarm-Verwaltung über das Protokoll
// ============================================================================

fn create_alarm<S: PersistentStorage>(
    controller: &mut AlarmController<S>,
    id: &str,
    due: u32,
    repeat: bool,
) {
    send(controller, &format!("$AlarmId$={id}#"));
    send(controller, &format!("$AlarmT$={due}#"));
    send(controller, &format!("$AlarmR$={}#", u8::from(repeat)));
}

#[test]
fn test_alarm_triad_creates_alarm() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    create_alarm(&mut controller, "wake", EPOCH + 500, true);

    let store = controller.alarms().unwrap();
    assert_eq!(
        store.get("wake").unwrap(),
        Some(Alarm::new("wake", EPOCH + 500, true))
    );
    assert_eq!(controller.pending_alarm().id.as_str(), "");
    assert_eq!(controller.pending_alarm().due, None);
}

#[test]
fn test_alarm_triad_updates_alarm() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    create_alarm(&mut controller, "wake", EPOCH + 500, true);
    create_alarm(&mut controller, "wake", EPOCH + 900, false);

    let alarms = controller.alarms().unwrap().alarms().unwrap();
    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0], (0, Alarm::new("wake", EPOCH + 900, false)));
}

#[test]
fn test_alarm_time_zero_deletes() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    create_alarm(&mut controller, "wake", EPOCH + 500, true);
    create_alarm(&mut controller, "wake", 0, false);

    assert_eq!(controller.alarms().unwrap().get("wake").unwrap(), None);
}

#[test]
fn test_commit_without_id_is_ignored() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    send(&mut controller, "$AlarmT$=1700000500#");
    send(&mut controller, "$AlarmR$=1#");

    assert!(controller.alarms().unwrap().alarms().unwrap().is_empty());
}

#[test]
fn test_malformed_repeat_flag_is_ignored() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    send(&mut controller, "$AlarmId$=wake#");
    send(&mut controller, "$AlarmT$=1700000500#");
    send(&mut controller, "$AlarmR$=maybe#");

    assert_eq!(controller.alarms().unwrap().get("wake").unwrap(), None);
}

#[test]
fn test_triad_in_one_poll_only_commits_last() {
    // Latest-wins: nur "$AlarmR$" wird verarbeitet, ID und Zeit fehlen
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    send(&mut controller, "$AlarmId$=wake#$AlarmT$=1700000500#$AlarmR$=1#");

    assert!(controller.alarms().unwrap().alarms().unwrap().is_empty());
}

#[test]
fn test_storage_failure_does_not_escape_step() {
    let clock = ManualClock::new(0);
    let mut storage = AlarmStore::new(FlakyStorage::default())
        .unwrap()
        .into_storage();
    storage.fail_writes = true;
    let mut controller = controller_on(&clock, storage, config(10));

    create_alarm(&mut controller, "wake", EPOCH + 500, true);

    assert_eq!(controller.alarms().unwrap().get("wake").unwrap(), None);
    assert_eq!(
        controller.handler().events.last(),
        Some(&HandlerEvent::ProduceOutgoing)
    );
}

// ============================================================================
// Tests: Alarm-Scheduling im Schritt
// ============================================================================

#[test]
fn test_alarm_fires_after_interval() {
    let clock = ManualClock::new(100);
    let mut controller = controller(&clock);

    send(&mut controller, "$Time$=1000000#");
    create_alarm(&mut controller, "wake", 1_000_030, false);

    clock.advance(20);
    controller.step();
    assert!(controller.handler().fired_alarms().is_empty());

    clock.advance(11);
    controller.step();
    assert_eq!(controller.handler().fired_alarms(), vec!["wake".to_owned()]);
    assert_eq!(controller.alarms().unwrap().get("wake").unwrap(), None);
}

#[test]
fn test_rate_limit_delays_due_alarm() {
    let clock = ManualClock::new(0);
    let mut controller = controller_on(&clock, memory(), config(60));

    send(&mut controller, "$Time$=1000000#");
    create_alarm(&mut controller, "late", 1_000_001, true);

    clock.advance(30);
    controller.step();
    assert!(controller.handler().fired_alarms().is_empty());

    clock.advance(31);
    controller.step();
    assert_eq!(controller.handler().fired_alarms(), vec!["late".to_owned()]);
    assert_eq!(
        controller.alarms().unwrap().get("late").unwrap(),
        Some(Alarm::new("late", 1_000_001 + 86_400, true))
    );
}

#[test]
fn test_alarm_fires_in_same_step_as_time_sync() {
    // Alarm liegt schon im Speicher (z.B. vor einem Neustart angelegt)
    let mut store = AlarmStore::new(memory()).unwrap();
    store.create_or_update("boot", 500, false).unwrap();

    let clock = ManualClock::new(5);
    let mut controller = Controller::with_store(
        MockTransport::new(),
        clock.clone(),
        store,
        RecordingHandler::new(),
        config(60),
    );

    send(&mut controller, "$Time$=1000#");

    assert_eq!(
        controller.handler().events,
        vec![
            HandlerEvent::PeriodicWork,
            HandlerEvent::AlarmFired("boot".to_owned()),
            HandlerEvent::ProduceOutgoing
        ]
    );
}

/// Uhr synchronisiert, ein einmaliger Alarm "wake" bei 1005, Events geleert
fn controller_with_pending_wake(clock: &ManualClock) -> AlarmController {
    let mut controller = controller(clock);
    send(&mut controller, "$Time$=1000#");
    create_alarm(&mut controller, "wake", 1_005, false);
    controller.handler_mut().events.clear();
    controller
}

#[test]
fn test_due_alarm_fires_before_periodic_work() {
    let clock = ManualClock::new(0);
    let mut controller = controller_with_pending_wake(&clock);

    clock.advance(20);
    send(&mut controller, "Temp=1#");

    assert_eq!(
        controller.handler().events,
        vec![
            HandlerEvent::AlarmFired("wake".to_owned()),
            HandlerEvent::PeriodicWork,
            incoming("Temp", "1"),
            HandlerEvent::ProduceOutgoing
        ]
    );
}

#[test]
fn test_sync_step_with_alarms_ends_after_sync() {
    let clock = ManualClock::new(0);
    let mut controller = controller_with_pending_wake(&clock);

    clock.advance(20);
    send(&mut controller, "Sync=Temp#");

    assert_eq!(
        controller.handler().events,
        vec![
            HandlerEvent::AlarmFired("wake".to_owned()),
            HandlerEvent::PeriodicWork,
            HandlerEvent::Sync("Temp".to_owned())
        ]
    );
}

#[test]
fn test_no_alarm_checks_before_sync() {
    let mut store = AlarmStore::new(memory()).unwrap();
    store.create_or_update("boot", 1, false).unwrap();

    let clock = ManualClock::new(0);
    let mut controller = controller_on(&clock, store.into_storage(), config(0));

    for _ in 0..3 {
        clock.advance(100);
        controller.step();
    }

    assert!(controller.handler().fired_alarms().is_empty());
}

// ============================================================================
// Tests: Controller ohne Alarme
// ============================================================================

#[test]
fn test_controller_without_alarms() {
    let clock = ManualClock::new(10);
    let mut controller = Controller::new(
        MockTransport::new(),
        clock.clone(),
        RecordingHandler::new(),
        ControllerConfig::default(),
    );

    for input in [
        "$AlarmId$=wake#",
        "$AlarmT$=1700000500#",
        "$AlarmR$=1#",
        "$Time$=1700000000#",
        "Temp=20#",
    ] {
        controller.transport_mut().push_input(input);
        controller.step();
    }

    assert!(controller.alarms().is_none());
    assert_eq!(controller.now(), EPOCH);
    assert_eq!(
        controller.handler().protocol_events(),
        vec![incoming("Temp", "20")]
    );
}

#[test]
fn test_broken_storage_falls_back_to_controller_without_alarms() {
    let clock = ManualClock::new(10);
    let storage = FlakyStorage {
        fail_writes: true,
        ..FlakyStorage::default()
    };

    // Gelöschter Speicher muss beim Öffnen geheilt werden, das Schreiben schlägt fehl
    let store = AlarmStore::new(storage);
    assert_eq!(store.err(), Some(StorageError::WriteFailed));

    let mut controller = Controller::new(
        MockTransport::new(),
        clock.clone(),
        RecordingHandler::new(),
        ControllerConfig::default(),
    );
    send(&mut controller, "$Time$=1700000000#");
    send(&mut controller, "Temp=20#");

    assert_eq!(controller.now(), EPOCH);
    assert_eq!(
        controller.handler().protocol_events(),
        vec![incoming("Temp", "20")]
    );
}

#[test]
fn test_outbound_outside_callbacks() {
    let clock = ManualClock::new(0);
    let mut controller = controller(&clock);

    controller.outbound().write_float("Temp", 21.5).unwrap();
    controller.outbound().write_triple("Acc", 0.0, 1.0, -1.0).unwrap();
    controller.outbound().log_ln("ready").unwrap();

    assert_eq!(
        controller.transport().written_str(),
        "Temp=21.500#Acc=0.00:1.00:-1.00#$DLN$=ready#"
    );
}
