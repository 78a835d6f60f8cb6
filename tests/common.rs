//! Shared builders for integration tests.

#![allow(dead_code)]

use kairo::prelude::*;
use serde_json::{Map, Value as Json, json};

/// Builds diagram documents the way the editor would save them, with a
/// usable solver configuration preset.
pub struct DiagramBuilder {
    nodes: Vec<Json>,
    edges: Vec<Json>,
    globals: Vec<Json>,
    solver: Map<String, Json>,
    events: Vec<Json>,
    code: String,
}

impl DiagramBuilder {
    pub fn new() -> Self {
        let mut solver = Map::new();
        solver.insert("duration".to_string(), json!("10"));
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            globals: Vec::new(),
            solver,
            events: Vec::new(),
            code: String::new(),
        }
    }

    pub fn node(mut self, id: &str, type_tag: &str, attrs: &[(&str, &str)]) -> Self {
        let mut data = Map::new();
        for (key, value) in attrs {
            data.insert(key.to_string(), json!(value));
        }
        self.nodes.push(json!({
            "id": id,
            "type": type_tag,
            "data": data,
        }));
        self
    }

    pub fn edge(self, source: &str, target: &str) -> Self {
        self.edge_with_handles(source, target, None, None)
    }

    pub fn edge_with_handles(
        mut self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
        target_handle: Option<&str>,
    ) -> Self {
        self.edges.push(json!({
            "source": source,
            "target": target,
            "sourceHandle": source_handle,
            "targetHandle": target_handle,
        }));
        self
    }

    pub fn global(mut self, name: &str, expression: &str) -> Self {
        self.globals.push(json!({"name": name, "value": expression}));
        self
    }

    pub fn solver_param(mut self, key: &str, value: &str) -> Self {
        self.solver.insert(key.to_string(), json!(value));
        self
    }

    pub fn event(mut self, type_tag: &str, name: &str, attrs: &[(&str, &str)]) -> Self {
        let mut event = Map::new();
        event.insert("type".to_string(), json!(type_tag));
        event.insert("name".to_string(), json!(name));
        for (key, value) in attrs {
            event.insert(key.to_string(), json!(value));
        }
        self.events.push(Json::Object(event));
        self
    }

    pub fn code(mut self, code: &str) -> Self {
        self.code = code.to_string();
        self
    }

    pub fn json(self) -> String {
        json!({
            "nodes": self.nodes,
            "edges": self.edges,
            "globalVariables": self.globals,
            "solverParameters": self.solver,
            "events": self.events,
            "freeformCode": self.code,
        })
        .to_string()
    }

    pub fn compiler(self) -> Compiler {
        Compiler::builder(self.json())
            .build()
            .expect("diagram should parse")
    }
}

/// A constant feeding an explicitly-declared scope.
pub fn constant_into_scope() -> DiagramBuilder {
    DiagramBuilder::new()
        .node("1", "constant", &[("label", "Feed"), ("value", "2.5")])
        .node("2", "scope", &[("label", "Monitor"), ("labels", "")])
        .edge("1", "2")
}
