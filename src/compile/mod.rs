//! The graph compiler: one pipeline, two backends.
//!
//! [`Compiler`] turns an untyped diagram into a fully-resolved [`Assembly`]:
//! typed blocks, index-resolved connections, scheduled events, and solver
//! settings. [`Compiler::build_system`] hands that assembly to the caller as
//! a live [`SystemGraph`]; [`Compiler::emit_script`] renders it as a
//! standalone script. Both backends share the assembly, so every resolved
//! index agrees between them bit for bit.

mod assembler;
mod binder;
mod events;
mod ports;
mod solver;

use crate::diagram::{Diagram, IntoDiagram, NameAllocator};
use crate::error::CompileError;
use crate::graph::{
    BlockInstance, Connection, ScheduledEvent, SolverSettings, SystemGraph,
};
use crate::registry::{BlockRegistry, EventRegistry};
use crate::script::{BlockHandle, Environment, Value, is_reserved_word, is_valid_identifier};
use log::{debug, info};

/// The fully-resolved intermediate form shared by both backends.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub blocks: Vec<BlockInstance>,
    pub connections: Vec<Connection>,
    /// Reset events first (block order), then standalone events
    /// (declaration order).
    pub events: Vec<ScheduledEvent>,
    pub solver: SolverSettings,
    pub duration: f64,
    /// Global variables as (name, raw expression text), declaration order.
    pub globals: Vec<(String, String)>,
    pub freeform_code: String,
}

/// Compiles one diagram. Consumed by whichever backend runs.
#[derive(Debug)]
pub struct Compiler {
    diagram: Diagram,
    blocks: BlockRegistry,
    events: EventRegistry,
}

/// Builder for [`Compiler`], accepting anything that converts into a
/// [`Diagram`].
#[derive(Debug)]
pub struct CompilerBuilder<D> {
    document: D,
    blocks: BlockRegistry,
    events: EventRegistry,
}

impl<D: IntoDiagram> CompilerBuilder<D> {
    /// Replaces the standard block registry.
    pub fn with_block_registry(mut self, registry: BlockRegistry) -> Self {
        self.blocks = registry;
        self
    }

    /// Replaces the standard event registry.
    pub fn with_event_registry(mut self, registry: EventRegistry) -> Self {
        self.events = registry;
        self
    }

    pub fn build(self) -> Result<Compiler, CompileError> {
        Ok(Compiler {
            diagram: self.document.into_diagram()?,
            blocks: self.blocks,
            events: self.events,
        })
    }
}

impl Compiler {
    pub fn builder<D: IntoDiagram>(document: D) -> CompilerBuilder<D> {
        CompilerBuilder {
            document,
            blocks: BlockRegistry::standard(),
            events: EventRegistry::standard(),
        }
    }

    /// Runs the full pipeline and returns the shared intermediate form.
    pub fn assemble(self) -> Result<Assembly, CompileError> {
        let diagram = &self.diagram;
        info!(
            "Compiling diagram: {} node(s), {} edge(s), {} event(s)",
            diagram.nodes.len(),
            diagram.edges.len(),
            diagram.events.len()
        );

        let mut env = Environment::with_builtins();

        // All global names are validated before any evaluation runs.
        let mut globals = Vec::with_capacity(diagram.global_variables.len());
        for global in &diagram.global_variables {
            let name = global.name.trim();
            if name.is_empty() {
                continue;
            }
            if !is_valid_identifier(name) {
                return Err(CompileError::InvalidIdentifier {
                    name: name.to_string(),
                    reason: "must start with a letter or underscore and contain only \
                             letters, digits, and underscores"
                        .to_string(),
                });
            }
            if is_reserved_word(name) {
                return Err(CompileError::InvalidIdentifier {
                    name: name.to_string(),
                    reason: "is a reserved word".to_string(),
                });
            }
        }
        for global in &diagram.global_variables {
            let name = global.name.trim();
            if name.is_empty() {
                continue;
            }
            let value = env
                .evaluate(&global.expression)
                .map_err(|err| CompileError::expression(name, &global.expression, err))?;
            env.define(name, value);
            globals.push((name.to_string(), global.expression.clone()));
        }
        debug!("Evaluated {} global variable(s)", globals.len());

        if !diagram.freeform_code.is_empty() {
            env.run(&diagram.freeform_code).map_err(|err| {
                CompileError::expression("freeform_code", &diagram.freeform_code, err)
            })?;
        }

        let (solver, duration) = solver::resolve(&diagram.solver_parameters, &env)?;

        let assembled = assembler::assemble(diagram, &self.blocks, &env)?;
        debug!(
            "Assembled {} block(s) and {} connection(s)",
            assembled.blocks.len(),
            assembled.connections.len()
        );

        // Every diagram node is bound by name so event code can reach it.
        // The injected default sink is not a node and stays unbound.
        for (index, block) in assembled.blocks.iter().enumerate() {
            if block.node_id == "scope_default" && index >= diagram.nodes.len() {
                continue;
            }
            env.define(
                &block.var_name,
                Value::Block(BlockHandle {
                    node_id: block.node_id.clone(),
                    index,
                }),
            );
        }

        // Blocks and events share the script namespace, so event names are
        // allocated against every name already taken by a block.
        let mut names = NameAllocator::new();
        for block in &assembled.blocks {
            names.allocate(&block.var_name);
        }
        let mut events = assembled.reset_events;
        for event in &mut events {
            event.name = names.allocate(&event.name);
        }
        events.extend(events::synthesize(
            &diagram.events,
            &self.events,
            &env,
            &mut names,
        )?);
        info!("Compiled {} scheduled event(s)", events.len());

        Ok(Assembly {
            blocks: assembled.blocks,
            connections: assembled.connections,
            events,
            solver,
            duration,
            globals,
            freeform_code: diagram.freeform_code.clone(),
        })
    }

    /// Live backend: the system graph plus the run duration.
    pub fn build_system(self) -> Result<(SystemGraph, f64), CompileError> {
        let assembly = self.assemble()?;
        let duration = assembly.duration;
        Ok((
            SystemGraph {
                blocks: assembly.blocks,
                connections: assembly.connections,
                events: assembly.events,
                solver: assembly.solver,
            },
            duration,
        ))
    }

    /// Emission backend: a deterministic standalone script.
    pub fn emit_script(self) -> Result<String, CompileError> {
        let assembly = self.assemble()?;
        Ok(crate::emit::render(&assembly))
    }
}
