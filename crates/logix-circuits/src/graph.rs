use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::{
    components::{Component, ComponentKind, Pin},
    propagate,
};

/// An error that can occur when mutating or querying a component graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum CircuitError {
    DuplicateId(String),
    MissingComponent(String),
    Cycle { source: String, dest: String },
    MalformedBranch(String),
}

// Hand-written `Display`/`Error` impls mirroring the `thiserror` messages:
// the `Cycle` variant's spec-mandated `source` field collides with
// `thiserror`'s automatic error-source detection, which would require
// `String: std::error::Error`. Behavior and message text are unchanged.
impl std::fmt::Display for CircuitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitError::DuplicateId(id) => {
                write!(f, "another component is already associated with id {id:?}")
            }
            CircuitError::MissingComponent(id) => {
                write!(f, "no component with id {id:?}")
            }
            CircuitError::Cycle { source, dest } => {
                write!(f, "connecting {source:?} to {dest:?} would close a feedback cycle")
            }
            CircuitError::MalformedBranch(msg) => {
                write!(f, "malformed branch: {msg}")
            }
        }
    }
}

impl std::error::Error for CircuitError {}

/// Authoritative index of the components of a circuit and their adjacency.
///
/// The graph owns every component, addresses them by id, and is the sole
/// authority on connectivity legality: a branch insertion that would close a
/// feedback cycle is rejected before any state changes. All gate operations
/// are combinational, so no cycle is ever permitted.
#[derive(Debug, Default)]
pub struct ComponentGraph {
    components: HashMap<String, Component>,
    /// Forward edges, keyed by source component id.
    edges: HashMap<String, Vec<(String, String)>>,
    /// Branches detached because a later insertion displaced them. Still
    /// present in the index until explicitly removed.
    displaced: Vec<String>,
}

impl ComponentGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component.
    ///
    /// Inserting a branch also attaches it to both endpoint pins and delivers
    /// the source pin's current level through it. If the destination pin
    /// already had an incoming branch, that branch is detached and parked for
    /// collection via [`take_displaced`](Self::take_displaced); at most one
    /// branch can be displaced by a single insertion.
    ///
    /// # Errors
    ///
    /// * [`CircuitError::DuplicateId`] if the id is already registered.
    /// * [`CircuitError::MissingComponent`] if a branch endpoint does not
    ///   exist.
    /// * [`CircuitError::Cycle`] if a branch would close a feedback path.
    /// * [`CircuitError::MalformedBranch`] if a branch endpoint has no pin at
    ///   the requested index.
    ///
    /// A failed insertion performs no mutation.
    pub fn add(&mut self, component: Component) -> Result<(), CircuitError> {
        if self.components.contains_key(component.id()) {
            return Err(CircuitError::DuplicateId(component.id().to_owned()));
        }

        if component.is_branch() {
            return self.attach_branch(component);
        }

        let id = component.id().to_owned();
        debug!(%id, kind = %component.component_type(), "component added");
        self.components.insert(id.clone(), component);
        self.component_added(&id);

        Ok(())
    }

    /// Detaches the component with the given id from the index and returns
    /// ownership of it.
    ///
    /// Removing a branch detaches the edge and drives the orphaned
    /// destination pin low. Removing a non-branch component does *not* remove
    /// incident branches; resolving those first is the caller's
    /// responsibility.
    pub fn remove(&mut self, id: &str) -> Result<Component, CircuitError> {
        if self.get(id)?.is_branch() {
            self.detach_branch(id);
        } else {
            self.edges.remove(id);
        }

        debug!(id, "component removed");
        Ok(self
            .components
            .remove(id)
            .expect("presence was checked above"))
    }

    /// Returns the component with the given id.
    pub fn get(&self, id: &str) -> Result<&Component, CircuitError> {
        self.components
            .get(id)
            .ok_or_else(|| CircuitError::MissingComponent(id.to_owned()))
    }

    /// Returns `true` if a branch from `source_id` to `dest_id` may be added
    /// without closing a feedback cycle.
    ///
    /// Walks forward through the existing branch edges starting from
    /// `dest_id`; the connection is illegal iff `source_id` is reachable from
    /// there. Pure query, no temporary mutation.
    pub fn can_connect(&self, source_id: &str, dest_id: &str) -> bool {
        let mut visited = HashSet::new();
        let mut frontier = VecDeque::from([dest_id]);

        while let Some(current) = frontier.pop_front() {
            if current == source_id {
                return false;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(edges) = self.edges.get(current) {
                frontier.extend(edges.iter().map(|(_, dest)| dest.as_str()));
            }
        }

        true
    }

    /// Notification hook registering a non-branch component in the adjacency
    /// index. Branch insertions update adjacency directly.
    pub fn component_added(&mut self, id: &str) {
        self.edges.entry(id.to_owned()).or_default();
    }

    /// Drains the ids of branches displaced by insertions since the last
    /// call. The displaced branches are still registered and must be removed
    /// by the caller.
    pub fn take_displaced(&mut self) -> Vec<String> {
        std::mem::take(&mut self.displaced)
    }

    /// Returns `true` if a component with the given id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    /// Returns the number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the graph holds no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns an iterator over the registered ids.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Returns an iterator over the registered components.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Returns the ids of the boundary input terminals.
    pub fn input_ids(&self) -> Vec<&str> {
        self.terminal_ids(|kind| matches!(kind, ComponentKind::Input { .. }))
    }

    /// Returns the ids of the boundary output terminals.
    pub fn output_ids(&self) -> Vec<&str> {
        self.terminal_ids(|kind| matches!(kind, ComponentKind::Output { .. }))
    }

    /// Returns the ids of all branches incident to the component with the
    /// given id, in input-side then output-side pin order.
    pub fn incident_branches(&self, id: &str) -> Result<Vec<String>, CircuitError> {
        Ok(self.get(id)?.attached_branches())
    }

    /// Returns the settled level of the component with the given id: the pin
    /// level for terminals, the first output level for gates, the carried
    /// level for branches.
    pub fn level(&self, id: &str) -> Result<bool, CircuitError> {
        Ok(match self.get(id)?.kind() {
            ComponentKind::Input { pin } | ComponentKind::Output { pin } => pin.is_active(),
            ComponentKind::Gate { outputs, .. } => {
                outputs.first().map(Pin::is_active).unwrap_or(false)
            }
            ComponentKind::Branch { active, .. } => *active,
        })
    }

    pub(crate) fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        self.components.get_mut(id)
    }

    fn terminal_ids(&self, select: impl Fn(&ComponentKind) -> bool) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .components
            .values()
            .filter(|c| select(c.kind()))
            .map(Component::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Validates and attaches a branch. The destination pin's previous
    /// incoming branch, if any, is displaced.
    fn attach_branch(&mut self, branch: Component) -> Result<(), CircuitError> {
        let id = branch.id().to_owned();
        let (source, source_index, dest, dest_index) = branch
            .branch_endpoints()
            .map(|(s, si, d, di)| (s.to_owned(), si, d.to_owned(), di))
            .expect("attach_branch is only called with branches");

        let source_level = self
            .get(&source)?
            .output_pin(source_index)
            .map(Pin::is_active)
            .ok_or_else(|| {
                CircuitError::MalformedBranch(format!(
                    "{source:?} has no output pin {source_index}"
                ))
            })?;

        let dest_pin = self.get(&dest)?.input_pin(dest_index).ok_or_else(|| {
            CircuitError::MalformedBranch(format!("{dest:?} has no input pin {dest_index}"))
        })?;
        let previous = dest_pin.branches().first().cloned();

        if !self.can_connect(&source, &dest) {
            return Err(CircuitError::Cycle { source, dest });
        }

        if let Some(old) = previous {
            debug!(branch = %old, "branch displaced");
            self.detach_branch(&old);
            self.displaced.push(old);
        }

        self.components.insert(id.clone(), branch);
        if let Some(pin) = self
            .components
            .get_mut(&source)
            .and_then(|c| c.output_pin_mut(source_index))
        {
            pin.attach(&id);
        }
        if let Some(pin) = self
            .components
            .get_mut(&dest)
            .and_then(|c| c.input_pin_mut(dest_index))
        {
            pin.attach(&id);
        }
        self.edges
            .entry(source.clone())
            .or_default()
            .push((id.clone(), dest.clone()));

        debug!(branch = %id, %source, %dest, "branch attached");
        propagate::deliver(self, &id, source_level);

        Ok(())
    }

    /// Detaches a branch from its endpoint pins and the adjacency index,
    /// driving the orphaned destination pin low. Tolerates branches that are
    /// already detached; the branch stays in the component index.
    fn detach_branch(&mut self, id: &str) {
        let Some((source, source_index, dest, dest_index)) = self
            .components
            .get(id)
            .and_then(Component::branch_endpoints)
            .map(|(s, si, d, di)| (s.to_owned(), si, d.to_owned(), di))
        else {
            return;
        };

        if let Some(pin) = self
            .components
            .get_mut(&source)
            .and_then(|c| c.output_pin_mut(source_index))
        {
            pin.detach(id);
        }
        if let Some(edges) = self.edges.get_mut(&source) {
            edges.retain(|(branch, _)| branch != id);
        }

        let mut orphaned = false;
        if let Some(pin) = self
            .components
            .get_mut(&dest)
            .and_then(|c| c.input_pin_mut(dest_index))
        {
            if pin.branches().first().map(String::as_str) == Some(id) {
                pin.detach(id);
                orphaned = true;
            }
        }
        if orphaned {
            propagate::wake_input(self, &dest, dest_index, false);
        }
    }
}
