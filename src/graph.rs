//! The compiled system graph: strongly-typed blocks, connections, scheduled
//! events, and solver settings, ready to hand to a numeric engine.

use crate::script::Value;

/// A constructor parameter after binding.
///
/// `raw` keeps the attribute text exactly as the user entered it; it is
/// `Some` only for explicitly-bound parameters (and for values the compiler
/// synthesizes itself, rendered back to source form). The emitter writes
/// `raw`, the live backend uses `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    pub name: String,
    pub value: Value,
    pub raw: Option<String>,
}

/// One fully-constructed block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInstance {
    pub node_id: String,
    pub label: String,
    /// Script variable name the block is bound under, also used in emission.
    pub var_name: String,
    pub type_tag: String,
    pub class_path: &'static str,
    pub params: Vec<BoundParam>,
    pub sink: bool,
}

impl BlockInstance {
    pub fn param(&self, name: &str) -> Option<&BoundParam> {
        self.params.iter().find(|p| p.name == name)
    }

    pub(crate) fn param_mut(&mut self, name: &str) -> Option<&mut BoundParam> {
        self.params.iter_mut().find(|p| p.name == name)
    }
}

/// A resolved connection, all endpoints as indices.
///
/// `source`/`target` index into the block list; `output`/`input` are the
/// resolved port numbers. Both backends agree on these bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub source: usize,
    pub output: usize,
    pub target: usize,
    pub input: usize,
}

/// When a scheduled event fires.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTrigger {
    /// Fixed firing times.
    Times(Vec<f64>),
    /// Periodic schedule window.
    Periodic {
        t_start: Value,
        t_end: Value,
        t_period: Value,
    },
    /// A callable evaluated by the engine (zero-crossing and condition
    /// detectors).
    Callable(Value),
}

/// What a scheduled event does when it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum EventAction {
    /// Reset one block to its initial state.
    Reset { block: usize },
    Callable(Value),
    None,
}

/// Where an event came from; emission differs between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOrigin {
    /// Synthesized from a block's reset-schedule parameter.
    BlockReset { block: usize },
    Standalone,
}

/// One scheduled event of the compiled system.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub name: String,
    pub type_tag: String,
    pub class_path: &'static str,
    /// All bound parameters in descriptor order, for emission.
    pub params: Vec<BoundParam>,
    pub trigger: EventTrigger,
    pub action: EventAction,
    pub origin: EventOrigin,
}

/// Solver configuration for the run, minus the duration (which the caller
/// receives separately).
#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    pub solver: String,
    pub log: bool,
    /// Remaining solver parameters, sorted by name.
    pub params: Vec<BoundParam>,
    /// Entries of the `extra` map, merged into the engine's keyword
    /// arguments.
    pub extra: Vec<(String, Value)>,
    /// Raw text of the `extra` expression, when one was given.
    pub extra_raw: Option<String>,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            solver: "SSPRK22".to_string(),
            log: false,
            params: Vec::new(),
            extra: Vec::new(),
            extra_raw: None,
        }
    }
}

/// The fully-compiled system, output of the live backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemGraph {
    pub blocks: Vec<BlockInstance>,
    pub connections: Vec<Connection>,
    pub events: Vec<ScheduledEvent>,
    pub solver: SolverSettings,
}
