//! Source emission: deterministic text and cross-backend index agreement.

mod common;

use common::DiagramBuilder;
use kairo::prelude::*;

fn simple() -> DiagramBuilder {
    DiagramBuilder::new()
        .global("k", "2")
        .node("1", "constant", &[("label", "Feed"), ("value", "k")])
        .node("2", "scope", &[("label", "Monitor"), ("labels", "")])
        .edge("1", "2")
}

#[test]
fn emits_the_expected_script() {
    let script = simple().compiler().emit_script().unwrap();
    let expected = "\
# Model script generated by kairo.

k = 2

feed_1 = blocks.Constant(value=k)
monitor_2 = blocks.Scope(labels=[\"Feed\"])

system = [feed_1, monitor_2]

connect(feed_1[0], monitor_2[0])

run(system, duration=10, solver=\"SSPRK22\", log=false)
";
    assert_eq!(script, expected);
}

#[test]
fn re_emission_is_byte_identical() {
    let first = simple().compiler().emit_script().unwrap();
    let second = simple().compiler().emit_script().unwrap();
    assert_eq!(first, second);
}

#[test]
fn emitted_connections_match_the_live_backend() {
    let builder = || {
        DiagramBuilder::new()
            .node("p", "process", &[("label", "Reactor")])
            .node("a", "scope", &[("label", "A"), ("labels", "")])
            .node("b", "scope", &[("label", "B"), ("labels", "")])
            .edge_with_handles("p", "b", Some("mass_flow_rate"), None)
            .edge_with_handles("p", "a", Some("inv"), None)
    };

    let (system, _) = builder().compiler().build_system().unwrap();
    let script = builder().compiler().emit_script().unwrap();

    for connection in &system.connections {
        let line = format!(
            "connect({}[{}], {}[{}])",
            system.blocks[connection.source].var_name,
            connection.output,
            system.blocks[connection.target].var_name,
            connection.input,
        );
        assert!(script.contains(&line), "missing line: {line}\n{script}");
    }
}

#[test]
fn default_parameters_are_omitted() {
    let script = DiagramBuilder::new()
        .node("1", "constant", &[("label", "Feed"), ("value", "")])
        .compiler()
        .emit_script()
        .unwrap();
    assert!(script.contains("feed_1 = blocks.Constant()"));
}

#[test]
fn raw_attribute_text_is_emitted_verbatim() {
    let script = DiagramBuilder::new()
        .global("base", "2")
        .node("1", "amplifier", &[("label", "Amp"), ("gain", "2 * base")])
        .node("2", "scope", &[("label", "Out"), ("labels", "")])
        .edge("1", "2")
        .compiler()
        .emit_script()
        .unwrap();
    assert!(script.contains("amp_1 = blocks.Amplifier(gain=2 * base)"));
}

#[test]
fn reset_events_are_emitted_with_their_block() {
    let script = DiagramBuilder::new()
        .node(
            "i1",
            "integrator",
            &[("label", "Tank"), ("reset_times", "[1, 2]")],
        )
        .compiler()
        .emit_script()
        .unwrap();
    assert!(
        script.contains("tank_i1_reset = events.Schedule(times=[1, 2], action=reset(tank_i1))")
    );
    assert!(script.contains("events = [tank_i1_reset]"));
    assert!(script.contains("run(system, events=events, duration=10"));
}

#[test]
fn event_code_is_emitted_by_name_or_verbatim() {
    let by_name = DiagramBuilder::new()
        .code("fn crossing(t) = t - 5")
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event("ZeroCrossing", "zc", &[("func_evt", "crossing")])
        .compiler()
        .emit_script()
        .unwrap();
    assert!(by_name.contains("zc = events.ZeroCrossing(func_evt=crossing)"));

    let verbatim = DiagramBuilder::new()
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event(
            "ZeroCrossing",
            "zc",
            &[("func_evt", "fn func_evt(t) = t - 2")],
        )
        .compiler()
        .emit_script()
        .unwrap();
    assert!(verbatim.contains("fn func_evt(t) = t - 2\nzc = events.ZeroCrossing(func_evt=func_evt)"));
}

#[test]
fn event_names_are_emitted_as_identifiers() {
    let script = DiagramBuilder::new()
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event("Schedule", "my sampler", &[("t_period", "2")])
        .compiler()
        .emit_script()
        .unwrap();
    assert!(script.contains("my_sampler = events.Schedule(t_period=2)"));
    assert!(script.contains("events = [my_sampler]"));
}

#[test]
fn colliding_event_names_get_counter_suffixes() {
    let script = DiagramBuilder::new()
        .node("c", "constant", &[("label", "C"), ("value", "1")])
        .event("Schedule", "tick", &[("t_period", "1")])
        .event("Schedule", "tick", &[("t_period", "2")])
        .compiler()
        .emit_script()
        .unwrap();
    assert!(script.contains("tick = events.Schedule(t_period=1)"));
    assert!(script.contains("tick_2 = events.Schedule(t_period=2)"));
    assert!(script.contains("events = [tick, tick_2]"));
}

#[test]
fn freeform_code_and_solver_extras_round_trip() {
    let script = DiagramBuilder::new()
        .code("fn double(x) = 2 * x")
        .node("1", "amplifier", &[("label", "Amp"), ("gain", "double(3)")])
        .node("2", "scope", &[("label", "Out"), ("labels", "")])
        .edge("1", "2")
        .solver_param("solver", "RKF21")
        .solver_param("log", "true")
        .solver_param("extra", "{\"tolerance_lte_abs\": 1e-6}")
        .compiler()
        .emit_script()
        .unwrap();
    assert!(script.contains("fn double(x) = 2 * x"));
    assert!(script.contains(
        "run(system, duration=10, solver=\"RKF21\", log=true, extra={\"tolerance_lte_abs\": 1e-6})"
    ));
}
