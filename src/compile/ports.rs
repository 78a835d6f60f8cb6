//! Port index resolution for edge endpoints.
//!
//! Three addressing strategies exist. Named ports go through the block's
//! port map. Positional ports carry a numeric suffix in the handle; the two
//! suffix dialects differ in base: `source-2` counts from zero, `source3`
//! counts from one. Single-port sides reject handles entirely and draw input
//! indices from a per-node arrival counter.

use crate::error::CompileError;
use crate::registry::PortStrategy;
use ahash::{AHashMap, AHashSet};

/// Resolves the output index for one edge endpoint.
pub(crate) fn resolve_output(
    node_id: &str,
    handle: Option<&str>,
    strategy: &PortStrategy,
) -> Result<usize, CompileError> {
    match strategy {
        PortStrategy::Named(_) => match handle {
            None => Ok(0),
            Some(h) => strategy
                .named_index(h)
                .ok_or_else(|| unknown_port(node_id, h)),
        },
        PortStrategy::Positional { arity } => positional(node_id, handle, *arity),
        PortStrategy::Single => match handle {
            None => Ok(0),
            Some(h) => Err(unknown_port(node_id, h)),
        },
    }
}

/// Resolves input indices, tracking the arrival counter for single-port
/// targets and rejecting inputs wired twice.
#[derive(Debug, Default)]
pub(crate) struct InputResolver {
    next_input: AHashMap<String, usize>,
    used: AHashSet<(String, usize)>,
}

impl InputResolver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn resolve(
        &mut self,
        node_id: &str,
        handle: Option<&str>,
        strategy: &PortStrategy,
    ) -> Result<usize, CompileError> {
        let index = match strategy {
            PortStrategy::Named(_) => match handle {
                None => 0,
                Some(h) => strategy
                    .named_index(h)
                    .ok_or_else(|| unknown_port(node_id, h))?,
            },
            PortStrategy::Positional { arity } => positional(node_id, handle, *arity)?,
            PortStrategy::Single => match handle {
                None => *self.next_input.get(node_id).unwrap_or(&0),
                Some(h) => return Err(unknown_port(node_id, h)),
            },
        };
        if !self.used.insert((node_id.to_string(), index)) {
            return Err(CompileError::DuplicateInputBinding {
                node_id: node_id.to_string(),
                input_index: index,
            });
        }
        // The counter advances once per wired edge, whatever the strategy.
        *self.next_input.entry(node_id.to_string()).or_insert(0) += 1;
        Ok(index)
    }
}

fn positional(node_id: &str, handle: Option<&str>, arity: usize) -> Result<usize, CompileError> {
    let handle = handle.ok_or_else(|| unknown_port(node_id, ""))?;
    let index = positional_index(handle).ok_or_else(|| unknown_port(node_id, handle))?;
    if index >= arity {
        return Err(CompileError::PortIndexOutOfRange {
            node_id: node_id.to_string(),
            handle: handle.to_string(),
            arity,
        });
    }
    Ok(index)
}

/// Parses the numeric suffix of a positional handle. `-`-separated suffixes
/// are zero-based, bare digit suffixes are one-based.
fn positional_index(handle: &str) -> Option<usize> {
    if let Some((_, suffix)) = handle.rsplit_once('-') {
        return suffix.parse::<usize>().ok();
    }
    let digits = handle.trim_start_matches(|c: char| !c.is_ascii_digit());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok()?.checked_sub(1)
}

fn unknown_port(node_id: &str, handle: &str) -> CompileError {
    CompileError::UnknownPort {
        node_id: node_id.to_string(),
        handle: handle.to_string(),
    }
}
