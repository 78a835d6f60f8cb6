//! Standalone event synthesis.
//!
//! Declared events are resolved against the event registry after every
//! block binding exists, so their code parameters can reference blocks by
//! variable name. Code parameters (`func_evt`, `func_act`) accept either the
//! name of an existing callable or statements defining one; statements run
//! in a copy of the environment so event helpers never leak between events.
//!
//! Event names become script variables next to the block names, so they go
//! through the same identifier derivation and the shared name allocator.

use crate::diagram::{EventSpec, NameAllocator, derive_event_var_name};
use crate::error::CompileError;
use crate::graph::{BoundParam, EventAction, EventOrigin, EventTrigger, ScheduledEvent};
use crate::registry::{EventDescriptor, EventParamKind, EventParamRole, EventRegistry};
use crate::script::{Environment, Value};

pub(crate) fn synthesize(
    specs: &[EventSpec],
    registry: &EventRegistry,
    env: &Environment,
    names: &mut NameAllocator,
) -> Result<Vec<ScheduledEvent>, CompileError> {
    let mut events = Vec::with_capacity(specs.len());
    for (position, spec) in specs.iter().enumerate() {
        let descriptor =
            registry
                .lookup(&spec.type_tag)
                .ok_or_else(|| CompileError::UnknownEventType {
                    name: spec.name.clone(),
                    type_tag: spec.type_tag.clone(),
                })?;
        let base = if spec.name.is_empty() {
            format!("{}_{}", spec.type_tag.to_lowercase(), position + 1)
        } else {
            derive_event_var_name(&spec.name)
        };
        let name = names.allocate(&base);
        events.push(build_event(spec, descriptor, name, env)?);
    }
    Ok(events)
}

fn build_event(
    spec: &EventSpec,
    descriptor: &EventDescriptor,
    name: String,
    env: &Environment,
) -> Result<ScheduledEvent, CompileError> {
    // Scratch copy so code parameters can define helpers without polluting
    // the compile-wide namespace.
    let mut scratch = env.clone();
    let mut params = Vec::with_capacity(descriptor.params.len());

    for param in &descriptor.params {
        let attr = spec
            .attributes
            .get(param.name)
            .map(String::as_str)
            .unwrap_or("");
        if attr.is_empty() {
            let default =
                param
                    .default
                    .clone()
                    .ok_or_else(|| CompileError::MissingRequiredParameter {
                        parameter: param.name.to_string(),
                        type_tag: spec.type_tag.clone(),
                        label: name.clone(),
                    })?;
            params.push(BoundParam {
                name: param.name.to_string(),
                value: default,
                raw: None,
            });
            continue;
        }
        let value = match param.kind {
            EventParamKind::Expression => scratch
                .evaluate(attr)
                .map_err(|err| CompileError::expression(param.name, attr, err))?,
            EventParamKind::Code => bind_code(&name, param.name, attr, &mut scratch)?,
        };
        params.push(BoundParam {
            name: param.name.to_string(),
            value,
            raw: Some(attr.to_string()),
        });
    }

    let trigger = derive_trigger(descriptor, &params, &name)?;
    let action = derive_action(descriptor, &params);

    Ok(ScheduledEvent {
        name,
        type_tag: spec.type_tag.clone(),
        class_path: descriptor.class_path,
        params,
        trigger,
        action,
        origin: EventOrigin::Standalone,
    })
}

/// Resolves a code parameter: an existing binding wins; otherwise the text
/// is run and a callable named after the parameter must appear.
fn bind_code(
    event: &str,
    param: &str,
    code: &str,
    scratch: &mut Environment,
) -> Result<Value, CompileError> {
    if let Some(existing) = scratch.lookup(code.trim()) {
        return match existing {
            Value::Func(_) => Ok(existing.clone()),
            other => Err(CompileError::InvalidEventSpec {
                name: event.to_string(),
                message: format!(
                    "'{}' names a {} where {} needs a callable",
                    code.trim(),
                    other.type_name(),
                    param
                ),
            }),
        };
    }
    scratch
        .run(code)
        .map_err(|err| CompileError::InvalidEventSpec {
            name: event.to_string(),
            message: format!("failed to run {param} code: {err}"),
        })?;
    match scratch.lookup(param) {
        Some(value @ Value::Func(_)) => Ok(value.clone()),
        Some(other) => Err(CompileError::InvalidEventSpec {
            name: event.to_string(),
            message: format!("{} is a {}, not a callable", param, other.type_name()),
        }),
        None => Err(CompileError::InvalidEventSpec {
            name: event.to_string(),
            message: format!("no callable named {param} was defined by its code"),
        }),
    }
}

fn derive_trigger(
    descriptor: &EventDescriptor,
    params: &[BoundParam],
    name: &str,
) -> Result<EventTrigger, CompileError> {
    let trigger_param = |wanted: &str| {
        params
            .iter()
            .find(|p| p.name == wanted)
            .map(|p| p.value.clone())
            .unwrap_or(Value::Null)
    };
    let has_code_trigger = descriptor
        .params
        .iter()
        .any(|p| p.role == EventParamRole::Trigger && p.kind == EventParamKind::Code);
    if has_code_trigger {
        return match trigger_param("func_evt") {
            func @ Value::Func(_) => Ok(EventTrigger::Callable(func)),
            _ => Err(CompileError::InvalidEventSpec {
                name: name.to_string(),
                message: "func_evt is required".to_string(),
            }),
        };
    }
    Ok(EventTrigger::Periodic {
        t_start: trigger_param("t_start"),
        t_end: trigger_param("t_end"),
        t_period: trigger_param("t_period"),
    })
}

fn derive_action(descriptor: &EventDescriptor, params: &[BoundParam]) -> EventAction {
    let action = descriptor
        .params
        .iter()
        .find(|p| p.role == EventParamRole::Action)
        .and_then(|spec| params.iter().find(|p| p.name == spec.name));
    match action {
        Some(param) => match &param.value {
            func @ Value::Func(_) => EventAction::Callable(func.clone()),
            _ => EventAction::None,
        },
        None => EventAction::None,
    }
}
