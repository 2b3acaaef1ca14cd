//! Undoable structural edits.

mod create;
mod delete;

pub use create::CreateCommand;
pub use delete::DeleteCommand;

use logix_circuits::CircuitError;

use crate::editor::Editor;

/// An error that can occur when filling or executing a command.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum EditError {
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error("requirement {0:?} has not been fulfilled")]
    Unfilled(String),
    #[error("no requirement with key {0:?}")]
    UnknownRequirement(String),
    #[error("value {value:?} is not acceptable for requirement {key:?}")]
    InvalidValue { key: String, value: String },
}

/// A reversible unit of graph mutation.
///
/// A command instance moves through `Unfilled -> Filled -> Executed <->
/// Unexecuted`: its requirements are fulfilled first, `execute` applies the
/// edit, and `unexecute` reverses it exactly. The same instance is retained
/// across undo/redo; re-execution restores previously created state instead
/// of rebuilding it, so a command is re-executable indefinitely.
pub trait Command: std::fmt::Debug {
    /// Applies the edit to the editor's graph.
    ///
    /// A failed execution performs no mutation.
    fn execute(&mut self, editor: &mut Editor) -> Result<(), EditError>;

    /// Reverses a previously executed edit.
    ///
    /// Reversing a successfully executed command cannot fail.
    fn unexecute(&mut self, editor: &mut Editor);
}
