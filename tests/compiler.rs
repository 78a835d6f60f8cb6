//! End-to-end compiles through the live backend.

mod common;

use common::{DiagramBuilder, constant_into_scope};
use kairo::prelude::*;

#[test]
fn compiles_a_minimal_diagram() {
    let (system, duration) = constant_into_scope().compiler().build_system().unwrap();
    assert_eq!(duration, 10.0);
    assert_eq!(system.blocks.len(), 2);
    assert_eq!(
        system.connections,
        vec![Connection {
            source: 0,
            output: 0,
            target: 1,
            input: 0,
        }]
    );
}

#[test]
fn unknown_block_type_is_rejected() {
    let err = DiagramBuilder::new()
        .node("1", "flux_capacitor", &[("label", "What")])
        .compiler()
        .build_system()
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::UnknownBlockType { ref type_tag, .. } if type_tag == "flux_capacitor"
    ));
}

#[test]
fn missing_required_parameter_names_the_block() {
    let err = DiagramBuilder::new()
        .node("1", "amplifier", &[("label", "Gain stage"), ("gain", "")])
        .compiler()
        .build_system()
        .unwrap_err();
    match err {
        CompileError::MissingRequiredParameter {
            parameter,
            type_tag,
            label,
        } => {
            assert_eq!(parameter, "gain");
            assert_eq!(type_tag, "amplifier");
            assert_eq!(label, "Gain stage");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn every_editor_block_tag_is_registered() {
    let registry = BlockRegistry::standard();
    let tags = [
        "constant",
        "source",
        "stepsource",
        "trianglewavesource",
        "sinusoidalsource",
        "gaussianpulsesource",
        "sinusoidalphasenoisesource",
        "chirpphasenoisesource",
        "chirpsource",
        "clocksource",
        "squarewavesource",
        "pulsesource",
        "rng",
        "white_noise",
        "pink_noise",
        "amplifier",
        "amplifier_reverse",
        "adder",
        "adder_reverse",
        "multiplier",
        "function",
        "function2to2",
        "integrator",
        "differentiator",
        "delay",
        "pid",
        "antiwinduppid",
        "samplehold",
        "comparator",
        "allpassfilter",
        "butterworthlowpass",
        "butterworthhighpass",
        "butterworthbandpass",
        "butterworthbandstop",
        "fir",
        "process",
        "process_horizontal",
        "splitter2",
        "splitter3",
        "bubbler",
        "wall",
        "scope",
        "spectrum",
    ];
    for tag in tags {
        assert!(registry.lookup(tag).is_some(), "missing block tag: {tag}");
    }
}

#[test]
fn mirrored_block_variants_share_their_base_schema() {
    let (system, _) = DiagramBuilder::new()
        .node("p", "process_horizontal", &[("label", "Reactor")])
        .node("a", "amplifier_reverse", &[("label", "Amp"), ("gain", "2")])
        .node("s", "scope", &[("label", "Out"), ("labels", "")])
        .edge_with_handles("p", "a", Some("mass_flow_rate"), None)
        .edge("a", "s")
        .compiler()
        .build_system()
        .unwrap();
    assert_eq!(system.blocks[0].class_path, "blocks.Process");
    assert_eq!(system.blocks[1].class_path, "blocks.Amplifier");
    // The named output map carries over to the mirrored variant.
    assert_eq!(system.connections[0].output, 1);
}

#[test]
fn non_ascii_label_characters_are_stripped_from_names() {
    let (system, _) = DiagramBuilder::new()
        .node("1", "constant", &[("label", "Débit π"), ("value", "1")])
        .compiler()
        .build_system()
        .unwrap();
    assert_eq!(system.blocks[0].var_name, "dbit__1");
}

#[test]
fn globals_evaluate_in_declaration_order() {
    let (system, _) = DiagramBuilder::new()
        .global("base", "2")
        .global("gain", "base * 3")
        .node("1", "amplifier", &[("label", "Amp"), ("gain", "gain")])
        .compiler()
        .build_system()
        .unwrap();
    assert_eq!(
        system.blocks[0].param("gain").unwrap().value,
        Value::Number(6.0)
    );
}

#[test]
fn forward_references_between_globals_fail() {
    let err = DiagramBuilder::new()
        .global("gain", "base * 3")
        .global("base", "2")
        .compiler()
        .build_system()
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::ExpressionEvaluation { ref name, .. } if name == "gain"
    ));
}

#[test]
fn reserved_words_are_invalid_global_names() {
    let err = DiagramBuilder::new()
        .global("fn", "1")
        .compiler()
        .build_system()
        .unwrap_err();
    assert!(matches!(err, CompileError::InvalidIdentifier { ref name, .. } if name == "fn"));
}

#[test]
fn invalid_global_names_fail_before_any_evaluation() {
    // The bad name comes second, but validation runs before evaluation, so
    // the first global's expression error never surfaces.
    let err = DiagramBuilder::new()
        .global("ok", "undefined_thing")
        .global("not a name", "1")
        .compiler()
        .build_system()
        .unwrap_err();
    assert!(matches!(err, CompileError::InvalidIdentifier { .. }));
}

#[test]
fn empty_global_names_are_skipped() {
    let (system, _) = DiagramBuilder::new()
        .global("", "nonsense +")
        .node("1", "constant", &[("label", "C"), ("value", "1")])
        .compiler()
        .build_system()
        .unwrap();
    assert_eq!(system.blocks.len(), 2); // constant + injected default sink
}

#[test]
fn freeform_helpers_are_usable_in_attributes() {
    let (system, _) = DiagramBuilder::new()
        .code("fn double(x) = 2 * x\nbase = 7")
        .node("1", "amplifier", &[("label", "Amp"), ("gain", "double(base)")])
        .compiler()
        .build_system()
        .unwrap();
    assert_eq!(
        system.blocks[0].param("gain").unwrap().value,
        Value::Number(14.0)
    );
}

#[test]
fn default_sink_collects_every_node_in_order() {
    let (system, _) = DiagramBuilder::new()
        .node("a", "constant", &[("label", "A"), ("value", "1")])
        .node("b", "constant", &[("label", "B"), ("value", "2")])
        .node("c", "constant", &[("label", "C"), ("value", "3")])
        .compiler()
        .build_system()
        .unwrap();

    let sink = system.blocks.last().unwrap();
    assert_eq!(sink.node_id, "scope_default");
    assert_eq!(sink.label, "Default Scope");
    assert!(sink.sink);
    assert_eq!(
        sink.param("labels").unwrap().value,
        Value::List(vec![
            Value::Str("A".to_string()),
            Value::Str("B".to_string()),
            Value::Str("C".to_string()),
        ])
    );

    let sink_index = system.blocks.len() - 1;
    let wired: Vec<_> = system
        .connections
        .iter()
        .map(|c| (c.source, c.output, c.target, c.input))
        .collect();
    assert_eq!(
        wired,
        vec![
            (0, 0, sink_index, 0),
            (1, 0, sink_index, 1),
            (2, 0, sink_index, 2),
        ]
    );
}

#[test]
fn no_default_sink_when_a_sink_exists() {
    let (system, _) = constant_into_scope().compiler().build_system().unwrap();
    assert!(!system.blocks.iter().any(|b| b.node_id == "scope_default"));
}

#[test]
fn dangling_edge_endpoints_are_rejected() {
    let err = DiagramBuilder::new()
        .node("1", "constant", &[("label", "C"), ("value", "1")])
        .edge("1", "ghost")
        .compiler()
        .build_system()
        .unwrap_err();
    assert!(matches!(err, CompileError::UnknownNode { ref node_id } if node_id == "ghost"));
}

#[test]
fn solver_settings_reach_the_system() {
    let (system, duration) = constant_into_scope()
        .solver_param("duration", "5 * 4")
        .solver_param("solver", "SSPRK33")
        .solver_param("log", "true")
        .solver_param("dt", "0.01")
        .compiler()
        .build_system()
        .unwrap();
    assert_eq!(duration, 20.0);
    assert_eq!(system.solver.solver, "SSPRK33");
    assert!(system.solver.log);
    assert_eq!(system.solver.params.len(), 1);
    assert_eq!(system.solver.params[0].name, "dt");
}

#[test]
fn both_backends_raise_the_same_error_for_the_same_input() {
    let builder = || {
        DiagramBuilder::new()
            .node("1", "amplifier", &[("label", "Amp"), ("gain", "")])
    };
    let live = builder().compiler().build_system().unwrap_err();
    let emitted = builder().compiler().emit_script().unwrap_err();
    assert_eq!(live, emitted);
}

#[test]
fn compiling_twice_is_deterministic() {
    let build = || {
        DiagramBuilder::new()
            .global("k", "2")
            .node("1", "constant", &[("label", "Feed"), ("value", "k")])
            .node("2", "amplifier", &[("label", "Amp"), ("gain", "3")])
            .node("3", "scope", &[("label", "Out"), ("labels", "")])
            .edge("1", "2")
            .edge("2", "3")
            .compiler()
            .build_system()
            .unwrap()
    };
    let (first, _) = build();
    let (second, _) = build();
    assert_eq!(first.blocks, second.blocks);
    assert_eq!(first.connections, second.connections);
}
