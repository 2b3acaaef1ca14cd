use crate::{
    command::{Command, EditError},
    editor::Editor,
};

/// Linear sequencing of executed commands for undo/redo.
///
/// Executing a new command discards the redo lane; a failed execution leaves
/// both lanes untouched.
#[derive(Debug, Default)]
pub struct CommandHistory {
    past: Vec<Box<dyn Command>>,
    future: Vec<Box<dyn Command>>,
}

impl CommandHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a command against the editor and records it.
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        editor: &mut Editor,
    ) -> Result<(), EditError> {
        command.execute(editor)?;
        self.future.clear();
        self.past.push(command);
        Ok(())
    }

    /// Reverses the most recent command. Returns `false` if there is nothing
    /// to undo.
    pub fn undo(&mut self, editor: &mut Editor) -> bool {
        match self.past.pop() {
            Some(mut command) => {
                command.unexecute(editor);
                self.future.push(command);
                true
            }
            None => false,
        }
    }

    /// Re-executes the most recently undone command. Returns `Ok(false)` if
    /// there is nothing to redo.
    pub fn redo(&mut self, editor: &mut Editor) -> Result<bool, EditError> {
        match self.future.pop() {
            Some(mut command) => {
                command.execute(editor)?;
                self.past.push(command);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns `true` if a command can be undone.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns `true` if a command can be redone.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
