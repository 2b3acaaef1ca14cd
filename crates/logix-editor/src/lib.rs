//! Undoable editing commands over a `logix` component graph.
//!
//! This crate layers the editing session on top of `logix-circuits`: an
//! [`Editor`] exclusively owns the component graph and the per-category id
//! generators, [`Command`]s perform validated, reversible structural edits
//! through it, and a [`CommandHistory`] sequences executed commands for
//! undo/redo.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod command;
mod editor;
mod generator;
mod history;
mod requirement;

pub use command::{Command, CreateCommand, DeleteCommand, EditError};
pub use editor::Editor;
pub use generator::IdGenerator;
pub use history::CommandHistory;
pub use requirement::{ReqKind, Requirement, Requirements};
