//! Circuit components.

pub(crate) mod gate;

use gate::GateOp;

/// A single-bit signal terminal embedded in its owning component.
///
/// A pin is directional by position: pins stored on the input side of a
/// component receive levels, pins on the output side drive them. The attached
/// wire endpoints are recorded as branch ids; an input-side pin holds at most
/// one, an output-side pin fans out to arbitrarily many.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pin {
    active: bool,
    branches: Vec<String>,
}

impl Pin {
    /// Returns the current signal level.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the ids of the branches attached to this pin.
    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    pub(crate) fn set_active(&mut self, value: bool) {
        self.active = value;
    }

    pub(crate) fn attach(&mut self, branch_id: &str) {
        self.branches.push(branch_id.to_owned());
    }

    pub(crate) fn detach(&mut self, branch_id: &str) {
        self.branches.retain(|b| b != branch_id);
    }
}

/// The user-facing category of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentType {
    /// Boundary source terminal.
    Input,
    /// Boundary sink terminal.
    Output,
    /// Primitive gate bundle.
    Gate(GateOp),
    /// Directed wire.
    Branch,
}

impl ComponentType {
    /// Every constructible category.
    pub const ALL: [ComponentType; 7] = [
        ComponentType::Input,
        ComponentType::Output,
        ComponentType::Gate(GateOp::And),
        ComponentType::Gate(GateOp::Or),
        ComponentType::Gate(GateOp::Xor),
        ComponentType::Gate(GateOp::Not),
        ComponentType::Branch,
    ];

    /// Returns a short human-readable description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ComponentType::Input => "input pin",
            ComponentType::Output => "output pin",
            ComponentType::Gate(GateOp::And) => "AND gate",
            ComponentType::Gate(GateOp::Or) => "OR gate",
            ComponentType::Gate(GateOp::Xor) => "XOR gate",
            ComponentType::Gate(GateOp::Not) => "NOT gate",
            ComponentType::Branch => "branch",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// The variant-specific state of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentKind {
    /// Boundary source terminal driving a single output-side pin.
    Input {
        /// The driven pin.
        pin: Pin,
    },
    /// Boundary sink terminal with a single input-side pin.
    Output {
        /// The receiving pin.
        pin: Pin,
    },
    /// A bundle of primitive gates sharing one operation.
    Gate {
        /// The gate operation.
        op: GateOp,
        /// Input-side pins.
        inputs: Vec<Pin>,
        /// Output-side pins. One pin for the aggregate operations, one per
        /// input for [`GateOp::Not`].
        outputs: Vec<Pin>,
    },
    /// A directed wire from an output-side pin to an input-side pin.
    Branch {
        /// Id of the component the wire leaves.
        source: String,
        /// Output-side pin index on the source.
        source_index: usize,
        /// Id of the component the wire enters.
        dest: String,
        /// Input-side pin index on the destination.
        dest_index: usize,
        /// The level currently carried by the wire.
        active: bool,
    },
}

/// A circuit component, identified by a graph-unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    id: String,
    kind: ComponentKind,
}

impl Component {
    /// Creates a boundary input terminal.
    pub fn input(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ComponentKind::Input { pin: Pin::default() },
        }
    }

    /// Creates a boundary output terminal.
    pub fn output(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ComponentKind::Output { pin: Pin::default() },
        }
    }

    /// Creates a primitive gate bundle with `pairs` pin pairs.
    pub fn gate(id: impl Into<String>, op: GateOp, pairs: usize) -> Self {
        Self {
            id: id.into(),
            kind: ComponentKind::Gate {
                op,
                inputs: vec![Pin::default(); pairs],
                outputs: vec![Pin::default(); op.output_count(pairs)],
            },
        }
    }

    /// Creates a branch connecting output-side pin `source_index` of `source`
    /// to input-side pin `dest_index` of `dest`.
    ///
    /// The branch carries no level until it is attached by
    /// [`ComponentGraph::add`](crate::ComponentGraph::add).
    pub fn branch(
        id: impl Into<String>,
        source: impl Into<String>,
        source_index: usize,
        dest: impl Into<String>,
        dest_index: usize,
    ) -> Self {
        Self {
            id: id.into(),
            kind: ComponentKind::Branch {
                source: source.into(),
                source_index,
                dest: dest.into(),
                dest_index,
                active: false,
            },
        }
    }

    /// Returns the id of the component.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the variant-specific state.
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Returns the category of the component.
    pub fn component_type(&self) -> ComponentType {
        match &self.kind {
            ComponentKind::Input { .. } => ComponentType::Input,
            ComponentKind::Output { .. } => ComponentType::Output,
            ComponentKind::Gate { op, .. } => ComponentType::Gate(*op),
            ComponentKind::Branch { .. } => ComponentType::Branch,
        }
    }

    /// Returns `true` if the component is a branch.
    pub fn is_branch(&self) -> bool {
        matches!(self.kind, ComponentKind::Branch { .. })
    }

    /// Returns the input-side pins. Empty for terminals without an input side
    /// and for branches.
    pub fn input_pins(&self) -> &[Pin] {
        match &self.kind {
            ComponentKind::Output { pin } => std::slice::from_ref(pin),
            ComponentKind::Gate { inputs, .. } => inputs,
            _ => &[],
        }
    }

    /// Returns the output-side pins. Empty for terminals without an output
    /// side and for branches.
    pub fn output_pins(&self) -> &[Pin] {
        match &self.kind {
            ComponentKind::Input { pin } => std::slice::from_ref(pin),
            ComponentKind::Gate { outputs, .. } => outputs,
            _ => &[],
        }
    }

    /// Returns the input-side pin at `index`, if present.
    pub fn input_pin(&self, index: usize) -> Option<&Pin> {
        self.input_pins().get(index)
    }

    /// Returns the output-side pin at `index`, if present.
    pub fn output_pin(&self, index: usize) -> Option<&Pin> {
        self.output_pins().get(index)
    }

    pub(crate) fn input_pin_mut(&mut self, index: usize) -> Option<&mut Pin> {
        match &mut self.kind {
            ComponentKind::Output { pin } if index == 0 => Some(pin),
            ComponentKind::Gate { inputs, .. } => inputs.get_mut(index),
            _ => None,
        }
    }

    pub(crate) fn output_pin_mut(&mut self, index: usize) -> Option<&mut Pin> {
        match &mut self.kind {
            ComponentKind::Input { pin } if index == 0 => Some(pin),
            ComponentKind::Gate { outputs, .. } => outputs.get_mut(index),
            _ => None,
        }
    }

    /// Returns `(source, source_index, dest, dest_index)` for a branch.
    pub fn branch_endpoints(&self) -> Option<(&str, usize, &str, usize)> {
        match &self.kind {
            ComponentKind::Branch {
                source,
                source_index,
                dest,
                dest_index,
                ..
            } => Some((source, *source_index, dest, *dest_index)),
            _ => None,
        }
    }

    /// Sets the level carried by a branch, returning the destination endpoint
    /// the level must be delivered to.
    pub(crate) fn set_branch_level(&mut self, value: bool) -> Option<(String, usize)> {
        match &mut self.kind {
            ComponentKind::Branch {
                dest,
                dest_index,
                active,
                ..
            } => {
                *active = value;
                Some((dest.clone(), *dest_index))
            }
            _ => None,
        }
    }

    /// Returns the ids of all branches attached to this component's pins, in
    /// input-side then output-side pin order.
    pub(crate) fn attached_branches(&self) -> Vec<String> {
        self.input_pins()
            .iter()
            .chain(self.output_pins())
            .flat_map(|pin| pin.branches().iter().cloned())
            .collect()
    }
}
