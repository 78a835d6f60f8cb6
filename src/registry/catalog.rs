//! The stock block and event catalog.

use super::{
    BlockDescriptor, EventDescriptor, EventParamKind, EventParamRole, EventParamSpec, ParamSpec,
    PortStrategy,
};
use crate::script::Value;

const PROCESS_OUTPUTS: &[(&str, usize)] = &[("inv", 0), ("mass_flow_rate", 1)];
const BUBBLER_OUTPUTS: &[(&str, usize)] = &[("vial", 0), ("stack", 1)];
const WALL_INPUTS: &[(&str, usize)] = &[("c_0", 0), ("c_L", 1)];
const WALL_OUTPUTS: &[(&str, usize)] = &[("flux_0", 0), ("flux_L", 1)];

fn num(n: f64) -> Option<Value> {
    Some(Value::Number(n))
}

fn empty_list() -> Option<Value> {
    Some(Value::List(Vec::new()))
}

fn null() -> Option<Value> {
    Some(Value::Null)
}

fn block(type_tag: &'static str, class_path: &'static str) -> BlockDescriptor {
    BlockDescriptor {
        type_tag,
        class_path,
        params: Vec::new(),
        inputs: PortStrategy::Single,
        outputs: PortStrategy::Single,
        sink: false,
        reset_param: None,
    }
}

pub(super) fn standard_blocks() -> Vec<BlockDescriptor> {
    let mut blocks = Vec::new();

    // Sources
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec {
            name: "value",
            default: num(0.0),
            bespoke: false,
        }],
        ..block("constant", "blocks.Constant")
    });
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec {
            name: "func",
            default: null(),
            bespoke: false,
        }],
        ..block("source", "blocks.Source")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("amplitude", Value::Number(1.0)),
            ParamSpec::with_default("tau", Value::Number(0.0)),
        ],
        ..block("stepsource", "blocks.StepSource")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("amplitude", Value::Number(1.0)),
            ParamSpec::with_default("frequency", Value::Number(1.0)),
        ],
        ..block("trianglewavesource", "blocks.TriangleWaveSource")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("amplitude", Value::Number(1.0)),
            ParamSpec::with_default("frequency", Value::Number(1.0)),
        ],
        ..block("squarewavesource", "blocks.SquareWaveSource")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("T", Value::Number(1.0)),
            ParamSpec::with_default("tau", Value::Number(0.0)),
        ],
        ..block("clocksource", "blocks.ClockSource")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("amplitude", Value::Number(1.0)),
            ParamSpec::with_default("frequency", Value::Number(1.0)),
            ParamSpec::with_default("phase", Value::Number(0.0)),
        ],
        ..block("sinusoidalsource", "blocks.SinusoidalSource")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("amplitude", Value::Number(1.0)),
            ParamSpec::with_default("f_max", Value::Number(1e3)),
        ],
        ..block("gaussianpulsesource", "blocks.GaussianPulseSource")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("amplitude", Value::Number(1.0)),
            ParamSpec::with_default("frequency", Value::Number(1.0)),
            ParamSpec::with_default("phase", Value::Number(0.0)),
            ParamSpec::with_default("sig_cum", Value::Number(0.0)),
            ParamSpec::with_default("sig_white", Value::Number(0.0)),
            ParamSpec::with_default("sampling_rate", Value::Number(10.0)),
        ],
        ..block(
            "sinusoidalphasenoisesource",
            "blocks.SinusoidalPhaseNoiseSource",
        )
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("amplitude", Value::Number(1.0)),
            ParamSpec::with_default("f0", Value::Number(1.0)),
            ParamSpec::with_default("BW", Value::Number(1.0)),
            ParamSpec::with_default("T", Value::Number(1.0)),
        ],
        ..block("chirpsource", "blocks.ChirpSource")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("amplitude", Value::Number(1.0)),
            ParamSpec::with_default("f0", Value::Number(1.0)),
            ParamSpec::with_default("BW", Value::Number(1.0)),
            ParamSpec::with_default("T", Value::Number(1.0)),
            ParamSpec::with_default("sig_cum", Value::Number(0.0)),
            ParamSpec::with_default("sig_white", Value::Number(0.0)),
            ParamSpec::with_default("sampling_rate", Value::Number(10.0)),
        ],
        ..block("chirpphasenoisesource", "blocks.ChirpPhaseNoiseSource")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("amplitude", Value::Number(1.0)),
            ParamSpec::with_default("t_start", Value::Number(0.0)),
            ParamSpec::with_default("t_duration", Value::Number(0.0)),
        ],
        ..block("pulsesource", "blocks.PulseSource")
    });
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec {
            name: "sampling_rate",
            default: null(),
            bespoke: false,
        }],
        ..block("rng", "blocks.RNG")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("spectral_density", Value::Number(1.0)),
            ParamSpec {
                name: "sampling_rate",
                default: null(),
                bespoke: false,
            },
        ],
        ..block("white_noise", "blocks.WhiteNoise")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("spectral_density", Value::Number(1.0)),
            ParamSpec::with_default("num_octaves", Value::Number(16.0)),
            ParamSpec {
                name: "sampling_rate",
                default: null(),
                bespoke: false,
            },
        ],
        ..block("pink_noise", "blocks.PinkNoise")
    });

    // Math
    // The editor saves mirrored orientations of some blocks under their own
    // tags; they share the base block's schema.
    let amplifier = BlockDescriptor {
        params: vec![ParamSpec::required("gain")],
        ..block("amplifier", "blocks.Amplifier")
    };
    blocks.push(BlockDescriptor {
        type_tag: "amplifier_reverse",
        ..amplifier.clone()
    });
    blocks.push(amplifier);
    let adder = BlockDescriptor {
        params: vec![ParamSpec::bespoke("operations")],
        ..block("adder", "blocks.Adder")
    };
    blocks.push(BlockDescriptor {
        type_tag: "adder_reverse",
        ..adder.clone()
    });
    blocks.push(adder);
    blocks.push(block("multiplier", "blocks.Multiplier"));
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec::required("func")],
        inputs: PortStrategy::Positional { arity: 1 },
        outputs: PortStrategy::Positional { arity: 1 },
        ..block("function", "blocks.Function")
    });
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec::required("func")],
        inputs: PortStrategy::Positional { arity: 2 },
        outputs: PortStrategy::Positional { arity: 2 },
        ..block("function2to2", "blocks.Function")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("initial_value", Value::Number(0.0)),
            ParamSpec {
                name: "reset_times",
                default: empty_list(),
                bespoke: false,
            },
        ],
        reset_param: Some("reset_times"),
        ..block("integrator", "blocks.Integrator")
    });
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec::with_default("f_max", Value::Number(100.0))],
        ..block("differentiator", "blocks.Differentiator")
    });
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec::with_default("tau", Value::Number(1.0))],
        ..block("delay", "blocks.Delay")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("Kp", Value::Number(1.0)),
            ParamSpec::with_default("Ki", Value::Number(0.0)),
            ParamSpec::with_default("Kd", Value::Number(0.0)),
            ParamSpec::with_default("f_max", Value::Number(100.0)),
        ],
        ..block("pid", "blocks.PID")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("Kp", Value::Number(1.0)),
            ParamSpec::with_default("Ki", Value::Number(0.0)),
            ParamSpec::with_default("Kd", Value::Number(0.0)),
            ParamSpec::with_default("f_max", Value::Number(100.0)),
            ParamSpec {
                name: "limits",
                default: null(),
                bespoke: false,
            },
        ],
        ..block("antiwinduppid", "blocks.AntiWindupPID")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("T", Value::Number(1.0)),
            ParamSpec::with_default("tau", Value::Number(0.0)),
        ],
        ..block("samplehold", "blocks.SampleHold")
    });
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec::with_default("threshold", Value::Number(0.0))],
        ..block("comparator", "blocks.Comparator")
    });

    // Filters
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec::required("Fc")],
        ..block("allpassfilter", "blocks.AllpassFilter")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::required("Fc"),
            ParamSpec::with_default("n", Value::Number(2.0)),
        ],
        ..block("butterworthlowpass", "blocks.ButterworthLowpassFilter")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::required("Fc"),
            ParamSpec::with_default("n", Value::Number(2.0)),
        ],
        ..block("butterworthhighpass", "blocks.ButterworthHighpassFilter")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::required("Fc"),
            ParamSpec::with_default("n", Value::Number(2.0)),
        ],
        ..block("butterworthbandpass", "blocks.ButterworthBandpassFilter")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::required("Fc"),
            ParamSpec::with_default("n", Value::Number(2.0)),
        ],
        ..block("butterworthbandstop", "blocks.ButterworthBandstopFilter")
    });
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec::required("coeffs")],
        ..block("fir", "blocks.FIR")
    });

    // Domain blocks
    let process = BlockDescriptor {
        params: vec![
            ParamSpec::with_default("residence_time", Value::Number(0.0)),
            ParamSpec::with_default("initial_value", Value::Number(0.0)),
            ParamSpec::with_default("source_term", Value::Number(0.0)),
        ],
        outputs: PortStrategy::Named(PROCESS_OUTPUTS),
        ..block("process", "blocks.Process")
    };
    blocks.push(BlockDescriptor {
        type_tag: "process_horizontal",
        ..process.clone()
    });
    blocks.push(process);
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec {
            name: "fractions",
            default: null(),
            bespoke: false,
        }],
        outputs: PortStrategy::Positional { arity: 2 },
        ..block("splitter2", "blocks.Splitter2")
    });
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec {
            name: "fractions",
            default: null(),
            bespoke: false,
        }],
        outputs: PortStrategy::Positional { arity: 3 },
        ..block("splitter3", "blocks.Splitter3")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::with_default("conversion_efficiency", Value::Number(1.0)),
            ParamSpec::required("vial_efficiency"),
            ParamSpec {
                name: "replacement_times",
                default: empty_list(),
                bespoke: false,
            },
        ],
        outputs: PortStrategy::Named(BUBBLER_OUTPUTS),
        reset_param: Some("replacement_times"),
        ..block("bubbler", "blocks.Bubbler")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec::required("thickness"),
            ParamSpec::required("temperature"),
            ParamSpec::required("D_0"),
            ParamSpec::required("E_D"),
            ParamSpec::with_default("surface_area", Value::Number(1.0)),
            ParamSpec::with_default("n_vertices", Value::Number(100.0)),
        ],
        inputs: PortStrategy::Named(WALL_INPUTS),
        outputs: PortStrategy::Named(WALL_OUTPUTS),
        ..block("wall", "blocks.FestimWall")
    });

    // Sinks
    blocks.push(BlockDescriptor {
        params: vec![ParamSpec {
            name: "labels",
            default: empty_list(),
            bespoke: false,
        }],
        sink: true,
        ..block("scope", "blocks.Scope")
    });
    blocks.push(BlockDescriptor {
        params: vec![
            ParamSpec {
                name: "labels",
                default: empty_list(),
                bespoke: false,
            },
            ParamSpec {
                name: "freq",
                default: null(),
                bespoke: false,
            },
        ],
        sink: true,
        ..block("spectrum", "blocks.Spectrum")
    });

    blocks
}

pub(super) fn standard_events() -> Vec<EventDescriptor> {
    fn expr(
        name: &'static str,
        role: EventParamRole,
        default: Option<Value>,
    ) -> EventParamSpec {
        EventParamSpec {
            name,
            kind: EventParamKind::Expression,
            role,
            default,
        }
    }
    fn code(name: &'static str, role: EventParamRole, required: bool) -> EventParamSpec {
        EventParamSpec {
            name,
            kind: EventParamKind::Code,
            role,
            default: if required { None } else { Some(Value::Null) },
        }
    }

    let crossing_params = || {
        vec![
            code("func_evt", EventParamRole::Trigger, true),
            code("func_act", EventParamRole::Action, false),
            expr(
                "tolerance",
                EventParamRole::Extra,
                Some(Value::Number(1e-4)),
            ),
        ]
    };

    vec![
        EventDescriptor {
            type_tag: "Schedule",
            class_path: "events.Schedule",
            params: vec![
                expr("t_start", EventParamRole::Trigger, Some(Value::Number(0.0))),
                expr("t_end", EventParamRole::Trigger, Some(Value::Null)),
                expr("t_period", EventParamRole::Trigger, Some(Value::Number(1.0))),
                code("func_act", EventParamRole::Action, false),
            ],
        },
        EventDescriptor {
            type_tag: "ZeroCrossing",
            class_path: "events.ZeroCrossing",
            params: crossing_params(),
        },
        EventDescriptor {
            type_tag: "ZeroCrossingUp",
            class_path: "events.ZeroCrossingUp",
            params: crossing_params(),
        },
        EventDescriptor {
            type_tag: "ZeroCrossingDown",
            class_path: "events.ZeroCrossingDown",
            params: crossing_params(),
        },
        EventDescriptor {
            type_tag: "Condition",
            class_path: "events.Condition",
            params: vec![
                code("func_evt", EventParamRole::Trigger, true),
                code("func_act", EventParamRole::Action, false),
            ],
        },
    ]
}
