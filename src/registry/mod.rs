//! Registries mapping diagram type tags to block and event descriptors.
//!
//! A registry is built once and shared read-only across compiles. The
//! standard catalog covers the engine's stock blocks; [`BlockRegistry::register`]
//! adds custom ones.

mod catalog;

use crate::script::Value;
use ahash::AHashMap;

/// Solver names accepted by the run settings.
pub const SOLVER_NAMES: &[&str] = &["SSPRK22", "SSPRK33", "RKF21"];

/// How a block addresses the ports on one of its sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortStrategy {
    /// One anonymous port. Edges must not carry a handle for this side;
    /// input indices are assigned by arrival order instead.
    Single,
    /// `arity` ports addressed by a numeric handle suffix.
    Positional { arity: usize },
    /// Ports addressed by name. An absent handle selects index 0.
    Named(&'static [(&'static str, usize)]),
}

impl PortStrategy {
    pub(crate) fn named_index(&self, handle: &str) -> Option<usize> {
        match self {
            PortStrategy::Named(map) => {
                map.iter().find(|(name, _)| *name == handle).map(|(_, i)| *i)
            }
            _ => None,
        }
    }
}

/// One constructor parameter of a block: its name in schema order, an
/// optional default, and whether binding is handled outside the binder.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: Option<Value>,
    pub bespoke: bool,
}

impl ParamSpec {
    pub fn required(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            bespoke: false,
        }
    }

    pub fn with_default(name: &'static str, default: Value) -> Self {
        Self {
            name,
            default: Some(default),
            bespoke: false,
        }
    }

    /// A parameter the automatic binder must skip (wired up elsewhere).
    pub fn bespoke(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            bespoke: true,
        }
    }
}

/// Everything the compiler knows about one block type.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDescriptor {
    pub type_tag: &'static str,
    /// Qualified constructor path in emitted scripts, e.g. `blocks.Amplifier`.
    pub class_path: &'static str,
    pub params: Vec<ParamSpec>,
    pub inputs: PortStrategy,
    pub outputs: PortStrategy,
    /// Sinks collect signals; their `labels` list is filled lazily and they
    /// suppress default-sink injection.
    pub sink: bool,
    /// Parameter whose bound times-list spawns a reset event per block.
    pub reset_param: Option<&'static str>,
}

/// Immutable lookup table from type tags to block descriptors.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    descriptors: AHashMap<&'static str, BlockDescriptor>,
}

impl BlockRegistry {
    /// The stock catalog of block types.
    pub fn standard() -> Self {
        let mut registry = Self::default();
        for descriptor in catalog::standard_blocks() {
            registry.register(descriptor);
        }
        registry
    }

    pub fn register(&mut self, descriptor: BlockDescriptor) {
        self.descriptors.insert(descriptor.type_tag, descriptor);
    }

    pub fn lookup(&self, type_tag: &str) -> Option<&BlockDescriptor> {
        self.descriptors.get(type_tag)
    }
}

/// Whether an event parameter holds an expression or executable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventParamKind {
    Expression,
    /// `func_evt` / `func_act` style: either the name of an existing callable
    /// or statements that define one.
    Code,
}

/// What an event parameter contributes to the scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventParamRole {
    Trigger,
    Action,
    Extra,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventParamSpec {
    pub name: &'static str,
    pub kind: EventParamKind,
    pub role: EventParamRole,
    /// `None` makes the parameter required.
    pub default: Option<Value>,
}

/// Everything the compiler knows about one standalone event type.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDescriptor {
    pub type_tag: &'static str,
    pub class_path: &'static str,
    pub params: Vec<EventParamSpec>,
}

/// Immutable lookup table from type tags to event descriptors.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    descriptors: AHashMap<&'static str, EventDescriptor>,
}

impl EventRegistry {
    pub fn standard() -> Self {
        let mut registry = Self::default();
        for descriptor in catalog::standard_events() {
            registry.register(descriptor);
        }
        registry
    }

    pub fn register(&mut self, descriptor: EventDescriptor) {
        self.descriptors.insert(descriptor.type_tag, descriptor);
    }

    pub fn lookup(&self, type_tag: &str) -> Option<&EventDescriptor> {
        self.descriptors.get(type_tag)
    }
}
