//! Reset events and standalone event synthesis.

mod common;

use common::DiagramBuilder;
use kairo::graph::{EventAction, EventOrigin, EventTrigger};
use kairo::prelude::*;

#[test]
fn integrator_reset_times_spawn_a_schedule_event() {
    let (system, _) = DiagramBuilder::new()
        .node(
            "i1",
            "integrator",
            &[("label", "Tank"), ("initial_value", "1"), ("reset_times", "[5, 10]")],
        )
        .compiler()
        .build_system()
        .unwrap();

    assert_eq!(system.events.len(), 1);
    let event = &system.events[0];
    assert_eq!(event.name, "tank_i1_reset");
    assert_eq!(event.trigger, EventTrigger::Times(vec![5.0, 10.0]));
    assert_eq!(event.action, EventAction::Reset { block: 0 });
    assert_eq!(event.origin, EventOrigin::BlockReset { block: 0 });
}

#[test]
fn empty_reset_times_spawn_nothing() {
    let (system, _) = DiagramBuilder::new()
        .node(
            "i1",
            "integrator",
            &[("label", "Tank"), ("initial_value", "1"), ("reset_times", "")],
        )
        .compiler()
        .build_system()
        .unwrap();
    assert!(system.events.is_empty());
}

#[test]
fn non_numeric_reset_times_are_rejected() {
    let err = DiagramBuilder::new()
        .node(
            "i1",
            "integrator",
            &[("label", "Tank"), ("reset_times", "[1, \"soon\"]")],
        )
        .compiler()
        .build_system()
        .unwrap_err();
    assert!(matches!(err, CompileError::InvalidEventSpec { .. }));
}

#[test]
fn schedule_event_uses_its_timing_parameters() {
    let (system, _) = DiagramBuilder::new()
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event(
            "Schedule",
            "sampler",
            &[("t_start", "1"), ("t_period", "0.5")],
        )
        .compiler()
        .build_system()
        .unwrap();

    assert_eq!(system.events.len(), 1);
    let event = &system.events[0];
    assert_eq!(event.name, "sampler");
    assert_eq!(
        event.trigger,
        EventTrigger::Periodic {
            t_start: Value::Number(1.0),
            t_end: Value::Null,
            t_period: Value::Number(0.5),
        }
    );
    assert_eq!(event.action, EventAction::None);
}

#[test]
fn unknown_event_type_is_rejected() {
    let err = DiagramBuilder::new()
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event("Eclipse", "never", &[])
        .compiler()
        .build_system()
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::UnknownEventType { ref type_tag, .. } if type_tag == "Eclipse"
    ));
}

#[test]
fn zero_crossing_requires_func_evt() {
    let err = DiagramBuilder::new()
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event("ZeroCrossing", "zc", &[])
        .compiler()
        .build_system()
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::MissingRequiredParameter { ref parameter, .. } if parameter == "func_evt"
    ));
}

#[test]
fn event_code_can_name_an_existing_callable() {
    let (system, _) = DiagramBuilder::new()
        .code("fn crossing(t) = t - 5")
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event("ZeroCrossing", "zc", &[("func_evt", "crossing")])
        .compiler()
        .build_system()
        .unwrap();
    assert!(matches!(system.events[0].trigger, EventTrigger::Callable(_)));
}

#[test]
fn event_code_can_define_its_own_callable() {
    let (system, _) = DiagramBuilder::new()
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event(
            "ZeroCrossingUp",
            "zc",
            &[("func_evt", "fn func_evt(t) = t - 2")],
        )
        .compiler()
        .build_system()
        .unwrap();
    assert!(matches!(system.events[0].trigger, EventTrigger::Callable(_)));
}

#[test]
fn event_code_definitions_do_not_leak_between_events() {
    // The first event defines func_evt in its own scratch namespace; the
    // second must still fail for lack of one.
    let err = DiagramBuilder::new()
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event(
            "ZeroCrossing",
            "first",
            &[("func_evt", "fn func_evt(t) = t - 2")],
        )
        .event("ZeroCrossing", "second", &[("func_evt", "func_evt")])
        .compiler()
        .build_system()
        .unwrap_err();
    assert!(matches!(err, CompileError::InvalidEventSpec { ref name, .. } if name == "second"));
}

#[test]
fn event_code_that_defines_no_callable_is_rejected() {
    let err = DiagramBuilder::new()
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event("Condition", "cond", &[("func_evt", "x = 3")])
        .compiler()
        .build_system()
        .unwrap_err();
    assert!(matches!(err, CompileError::InvalidEventSpec { .. }));
}

#[test]
fn event_code_can_reference_blocks_by_variable_name() {
    let (system, _) = DiagramBuilder::new()
        .node("t1", "integrator", &[("label", "Tank")])
        .event(
            "Condition",
            "drained",
            &[("func_evt", "fn func_evt() = tank_t1")],
        )
        .compiler()
        .build_system()
        .unwrap();
    assert!(matches!(system.events[0].trigger, EventTrigger::Callable(_)));
}

#[test]
fn reset_events_precede_standalone_events() {
    let (system, _) = DiagramBuilder::new()
        .node("i1", "integrator", &[("label", "Tank"), ("reset_times", "[1]")])
        .event("Schedule", "sampler", &[("t_start", "0")])
        .compiler()
        .build_system()
        .unwrap();
    assert_eq!(system.events.len(), 2);
    assert_eq!(system.events[0].origin, EventOrigin::BlockReset { block: 0 });
    assert_eq!(system.events[1].origin, EventOrigin::Standalone);
}

#[test]
fn unnamed_events_get_a_deterministic_name() {
    let (system, _) = DiagramBuilder::new()
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event("Schedule", "", &[("t_start", "0")])
        .compiler()
        .build_system()
        .unwrap();
    assert_eq!(system.events[0].name, "schedule_1");
}
