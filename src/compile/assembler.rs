//! Deterministic construction of blocks and connections.
//!
//! Blocks are built in diagram order. Connections are produced by walking
//! the nodes in diagram order and, per node, its outgoing edges sorted by
//! target node id (stable). Sink blocks without labels collect one label per
//! incoming edge as connections are wired, and a default sink is injected
//! when the diagram declares none.

use crate::compile::binder::bind_block;
use crate::compile::ports::{InputResolver, resolve_output};
use crate::diagram::{Diagram, NameAllocator, derive_var_name};
use crate::error::CompileError;
use crate::graph::{
    BlockInstance, BoundParam, Connection, EventAction, EventOrigin, EventTrigger, ScheduledEvent,
};
use crate::registry::{BlockDescriptor, BlockRegistry};
use crate::script::{Environment, Value};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

pub(crate) struct AssembledGraph {
    pub blocks: Vec<BlockInstance>,
    pub connections: Vec<Connection>,
    /// Reset events synthesized from block parameters, in block order.
    pub reset_events: Vec<ScheduledEvent>,
}

pub(crate) fn assemble(
    diagram: &Diagram,
    registry: &BlockRegistry,
    env: &Environment,
) -> Result<AssembledGraph, CompileError> {
    let mut blocks = Vec::with_capacity(diagram.nodes.len());
    let mut descriptors: Vec<&BlockDescriptor> = Vec::with_capacity(diagram.nodes.len());
    let mut index_of: AHashMap<&str, usize> = AHashMap::with_capacity(diagram.nodes.len());
    let mut names = NameAllocator::new();
    let mut reset_events = Vec::new();

    for node in &diagram.nodes {
        let descriptor =
            registry
                .lookup(&node.type_tag)
                .ok_or_else(|| CompileError::UnknownBlockType {
                    node_id: node.id.clone(),
                    type_tag: node.type_tag.clone(),
                })?;
        let params = bind_block(node, descriptor, env)?;
        let var_name = names.allocate(&derive_var_name(node.display_label(), &node.id));
        let index = blocks.len();
        index_of.insert(node.id.as_str(), index);
        blocks.push(BlockInstance {
            node_id: node.id.clone(),
            label: node.display_label().to_string(),
            var_name,
            type_tag: node.type_tag.clone(),
            class_path: descriptor.class_path,
            params,
            sink: descriptor.sink,
        });
        descriptors.push(descriptor);

        if let Some(reset_param) = descriptor.reset_param {
            if let Some(event) = reset_event(&blocks[index], index, reset_param)? {
                reset_events.push(event);
            }
        }
    }

    for edge in &diagram.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !index_of.contains_key(endpoint.as_str()) {
                return Err(CompileError::UnknownNode {
                    node_id: endpoint.clone(),
                });
            }
        }
    }

    let mut connections = Vec::with_capacity(diagram.edges.len());
    let mut inputs = InputResolver::new();
    let mut lazily_labelled: AHashSet<usize> = AHashSet::new();

    for node in &diagram.nodes {
        let source = index_of[node.id.as_str()];
        let outgoing = diagram
            .edges
            .iter()
            .filter(|edge| edge.source == node.id)
            .sorted_by(|a, b| a.target.cmp(&b.target));

        for edge in outgoing {
            let target = index_of[edge.target.as_str()];
            let output = resolve_output(
                &edge.source,
                edge.source_handle.as_deref(),
                &descriptors[source].outputs,
            )?;
            let input = inputs.resolve(
                &edge.target,
                edge.target_handle.as_deref(),
                &descriptors[target].inputs,
            )?;

            if blocks[target].sink {
                push_sink_label(
                    &mut blocks,
                    &mut lazily_labelled,
                    target,
                    node.display_label(),
                    edge.source_handle.as_deref(),
                );
            }

            connections.push(Connection {
                source,
                output,
                target,
                input,
            });
        }
    }

    if !blocks.iter().any(|block| block.sink) {
        if let Some(descriptor) = registry.lookup("scope") {
            inject_default_sink(diagram, descriptor, &mut blocks, &mut connections);
        }
    }

    Ok(AssembledGraph {
        blocks,
        connections,
        reset_events,
    })
}

/// Builds the reset event for a block whose reset-schedule parameter bound
/// to a non-empty times list.
fn reset_event(
    block: &BlockInstance,
    index: usize,
    reset_param: &str,
) -> Result<Option<ScheduledEvent>, CompileError> {
    let Some(param) = block.param(reset_param) else {
        return Ok(None);
    };
    let times = match &param.value {
        Value::List(items) if items.is_empty() => return Ok(None),
        Value::Null => return Ok(None),
        Value::List(items) => {
            let mut times = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Number(n) => times.push(*n),
                    other => {
                        return Err(CompileError::InvalidEventSpec {
                            name: format!("{}_reset", block.var_name),
                            message: format!(
                                "{} must be a list of numbers, found {}",
                                reset_param,
                                other.type_name()
                            ),
                        });
                    }
                }
            }
            times
        }
        other => {
            return Err(CompileError::InvalidEventSpec {
                name: format!("{}_reset", block.var_name),
                message: format!(
                    "{} must be a list of numbers, found {}",
                    reset_param,
                    other.type_name()
                ),
            });
        }
    };
    let raw = param
        .raw
        .clone()
        .unwrap_or_else(|| param.value.to_string());
    Ok(Some(ScheduledEvent {
        name: format!("{}_reset", block.var_name),
        type_tag: "Schedule".to_string(),
        class_path: "events.Schedule",
        params: vec![BoundParam {
            name: "times".to_string(),
            value: param.value.clone(),
            raw: Some(raw),
        }],
        trigger: EventTrigger::Times(times),
        action: EventAction::Reset { block: index },
        origin: EventOrigin::BlockReset { block: index },
    }))
}

/// Appends a label to a lazily-labelled sink. The source handle is appended
/// in parentheses only when the bare label collides with one already pushed.
fn push_sink_label(
    blocks: &mut [BlockInstance],
    lazily_labelled: &mut AHashSet<usize>,
    target: usize,
    source_label: &str,
    source_handle: Option<&str>,
) {
    let Some(param) = blocks[target].param_mut("labels") else {
        return;
    };
    let currently_empty = matches!(&param.value, Value::List(items) if items.is_empty());
    if currently_empty {
        lazily_labelled.insert(target);
    }
    if !lazily_labelled.contains(&target) {
        return;
    }
    let Value::List(labels) = &mut param.value else {
        return;
    };
    let bare = source_label.to_string();
    let collides = labels.iter().any(|l| matches!(l, Value::Str(s) if *s == bare));
    let label = match source_handle {
        Some(handle) if collides => format!("{bare} ({handle})"),
        _ => bare,
    };
    labels.push(Value::Str(label));
    param.raw = Some(param.value.to_string());
}

/// Injects the default sink: one label per node in diagram order, output 0
/// of every non-sink block wired to sequential inputs.
fn inject_default_sink(
    diagram: &Diagram,
    descriptor: &BlockDescriptor,
    blocks: &mut Vec<BlockInstance>,
    connections: &mut Vec<Connection>,
) {
    let labels = Value::List(
        diagram
            .nodes
            .iter()
            .map(|node| Value::Str(node.display_label().to_string()))
            .collect(),
    );
    let raw = labels.to_string();
    let mut params = vec![BoundParam {
        name: "labels".to_string(),
        value: labels,
        raw: Some(raw),
    }];
    for spec in &descriptor.params {
        if spec.name != "labels" && !spec.bespoke {
            if let Some(default) = &spec.default {
                params.push(BoundParam {
                    name: spec.name.to_string(),
                    value: default.clone(),
                    raw: None,
                });
            }
        }
    }

    let sink_index = blocks.len();
    let sources: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| !block.sink)
        .map(|(i, _)| i)
        .collect();

    blocks.push(BlockInstance {
        node_id: "scope_default".to_string(),
        label: "Default Scope".to_string(),
        var_name: "scope_default".to_string(),
        type_tag: descriptor.type_tag.to_string(),
        class_path: descriptor.class_path,
        params,
        sink: true,
    });

    for (input, source) in sources.into_iter().enumerate() {
        connections.push(Connection {
            source,
            output: 0,
            target: sink_index,
            input,
        });
    }
}
