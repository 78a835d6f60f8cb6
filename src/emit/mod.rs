//! Script emission.
//!
//! Renders an [`Assembly`] as a standalone runner script. The renderer is a
//! pure function of the assembly, so an unchanged diagram always re-emits
//! byte-identical text. Raw attribute and global text is written exactly as
//! the user entered it; values the compiler synthesized (default sink
//! labels, lazily-pushed sink labels) were rendered back to source form at
//! the point of mutation and come through `BoundParam::raw` like everything
//! else.

use crate::compile::Assembly;
use crate::graph::{BlockInstance, EventOrigin, ScheduledEvent};
use crate::script::is_valid_identifier;
use std::fmt::Write;

/// Renders the assembly as script text.
pub fn render(assembly: &Assembly) -> String {
    let mut out = String::new();
    // Infallible: writing to a String cannot fail.
    let _ = write_script(&mut out, assembly);
    out
}

fn write_script(out: &mut String, assembly: &Assembly) -> std::fmt::Result {
    writeln!(out, "# Model script generated by kairo.")?;
    writeln!(out)?;

    if !assembly.freeform_code.is_empty() {
        writeln!(out, "{}", assembly.freeform_code.trim_end())?;
        writeln!(out)?;
    }

    if !assembly.globals.is_empty() {
        for (name, expression) in &assembly.globals {
            writeln!(out, "{name} = {expression}")?;
        }
        writeln!(out)?;
    }

    for block in &assembly.blocks {
        write_block(out, block)?;
    }
    writeln!(out)?;

    let block_names = assembly
        .blocks
        .iter()
        .map(|block| block.var_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "system = [{block_names}]")?;
    writeln!(out)?;

    for connection in &assembly.connections {
        writeln!(
            out,
            "connect({}[{}], {}[{}])",
            assembly.blocks[connection.source].var_name,
            connection.output,
            assembly.blocks[connection.target].var_name,
            connection.input,
        )?;
    }
    if !assembly.connections.is_empty() {
        writeln!(out)?;
    }

    for event in &assembly.events {
        write_event(out, event, &assembly.blocks)?;
    }
    if !assembly.events.is_empty() {
        let event_names = assembly
            .events
            .iter()
            .map(|event| event.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "events = [{event_names}]")?;
        writeln!(out)?;
    }

    write_run(out, assembly)
}

/// One constructor statement per block; only explicitly-bound parameters
/// appear, as raw text, in schema order.
fn write_block(out: &mut String, block: &BlockInstance) -> std::fmt::Result {
    let args = block
        .params
        .iter()
        .filter_map(|param| {
            param
                .raw
                .as_ref()
                .map(|raw| format!("{}={}", param.name, raw))
        })
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "{} = {}({})", block.var_name, block.class_path, args)
}

fn write_event(
    out: &mut String,
    event: &ScheduledEvent,
    blocks: &[BlockInstance],
) -> std::fmt::Result {
    if let EventOrigin::BlockReset { block } = &event.origin {
        let times = event
            .params
            .iter()
            .find(|p| p.name == "times")
            .and_then(|p| p.raw.as_deref())
            .unwrap_or("[]");
        writeln!(
            out,
            "{} = events.Schedule(times={}, action=reset({}))",
            event.name, times, blocks[*block].var_name,
        )?;
        return Ok(());
    }

    // Inline code parameters are emitted verbatim ahead of the constructor
    // and referenced by the parameter name they defined.
    let mut args = Vec::new();
    for param in &event.params {
        let Some(raw) = &param.raw else { continue };
        if is_code_param(&param.name) && !is_valid_identifier(raw.trim()) {
            writeln!(out, "{}", raw.trim_end())?;
            args.push(format!("{}={}", param.name, param.name));
        } else {
            args.push(format!("{}={}", param.name, raw.trim()));
        }
    }
    writeln!(
        out,
        "{} = {}({})",
        event.name,
        event.class_path,
        args.join(", ")
    )
}

fn is_code_param(name: &str) -> bool {
    name == "func_evt" || name == "func_act"
}

fn write_run(out: &mut String, assembly: &Assembly) -> std::fmt::Result {
    let mut args = vec!["system".to_string()];
    if !assembly.events.is_empty() {
        args.push("events=events".to_string());
    }
    args.push(format!("duration={}", crate::script::Value::Number(assembly.duration)));
    args.push(format!("solver=\"{}\"", assembly.solver.solver));
    args.push(format!("log={}", assembly.solver.log));
    for param in &assembly.solver.params {
        if let Some(raw) = &param.raw {
            args.push(format!("{}={}", param.name, raw));
        }
    }
    if let Some(extra) = &assembly.solver.extra_raw {
        args.push(format!("extra={extra}"));
    }
    writeln!(out, "run({})", args.join(", "))
}
