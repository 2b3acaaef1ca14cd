//! Types for modeling an editable digital-logic circuit as a component graph.
//!
//! A circuit is a collection of [`Component`]s (boundary pins, primitive
//! gates and branches) owned by a [`ComponentGraph`], which indexes them by
//! id and guarantees that the branch digraph stays acyclic. Signal levels are
//! pushed through the graph by the [`PropagationEngine`] until quiescence.
//!
//! Structural edits are expected to go through the command layer in
//! `logix-editor`, which layers undo/redo on top of the operations exposed
//! here.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod components;
mod graph;
mod propagate;

pub use components::{gate::GateOp, Component, ComponentKind, ComponentType, Pin};
pub use graph::{CircuitError, ComponentGraph};
pub use propagate::PropagationEngine;
