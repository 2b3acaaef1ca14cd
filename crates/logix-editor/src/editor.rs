use std::collections::HashMap;

use logix_circuits::{CircuitError, ComponentGraph, ComponentType, GateOp, PropagationEngine};

use crate::{generator::IdGenerator, requirement};

/// The editing session context: exclusive owner of the component graph and
/// the per-category id generators.
///
/// Every command operates through a single `&mut Editor`, which keeps one
/// structural edit in flight at a time without any locking discipline.
#[derive(Debug)]
pub struct Editor {
    graph: ComponentGraph,
    engine: PropagationEngine,
    generators: HashMap<ComponentType, IdGenerator>,
}

impl Editor {
    /// Creates an editor over an empty graph.
    pub fn new() -> Self {
        let generators = ComponentType::ALL
            .into_iter()
            .map(|ty| (ty, IdGenerator::new(default_template(ty))))
            .collect();

        Self {
            graph: ComponentGraph::new(),
            engine: PropagationEngine::new(),
            generators,
        }
    }

    /// Returns the component graph.
    pub fn graph(&self) -> &ComponentGraph {
        &self.graph
    }

    /// Returns mutable access to the component graph.
    pub fn graph_mut(&mut self) -> &mut ComponentGraph {
        &mut self.graph
    }

    /// Returns `true` if a component with the given id is registered.
    pub fn exists(&self, id: &str) -> bool {
        self.graph.contains(id)
    }

    /// Returns the next generated id for the category, skipping ids that are
    /// already in use.
    pub fn next_id(&mut self, ty: ComponentType) -> String {
        let generator = self
            .generators
            .entry(ty)
            .or_insert_with(|| IdGenerator::new(default_template(ty)));

        loop {
            let id = generator.next_id();
            if !self.graph.contains(&id) {
                return id;
            }
        }
    }

    /// Returns `true` if `name` can be used for a new component: nonempty,
    /// no whitespace, not already taken.
    pub fn is_name_available(&self, name: &str) -> bool {
        requirement::name_pattern().is_match(name) && !self.exists(name)
    }

    /// Drives the input terminal with the given id to `value` and propagates
    /// the change downstream.
    pub fn set_input(&mut self, id: &str, value: bool) -> Result<(), CircuitError> {
        self.engine.wake(&mut self.graph, id, 0, value)
    }

    /// Returns the settled level of the component with the given id.
    pub fn level(&self, id: &str) -> Result<bool, CircuitError> {
        self.graph.level(id)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

fn default_template(ty: ComponentType) -> &'static str {
    match ty {
        ComponentType::Input => "in{}",
        ComponentType::Output => "out{}",
        ComponentType::Gate(GateOp::And) => "and{}",
        ComponentType::Gate(GateOp::Or) => "or{}",
        ComponentType::Gate(GateOp::Xor) => "xor{}",
        ComponentType::Gate(GateOp::Not) => "not{}",
        ComponentType::Branch => "br{}",
    }
}
