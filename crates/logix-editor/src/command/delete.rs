use logix_circuits::Component;

use crate::{
    command::{Command, EditError},
    editor::Editor,
    requirement::{ReqKind, Requirements},
};

/// Removes a component from the editor's graph.
///
/// Deleting a gate or terminal with live incident branches first deletes
/// those branches through inner commands, so the edit never leaves a
/// dangling edge behind; undo restores the component and then the branches.
#[derive(Debug)]
pub struct DeleteCommand {
    requirements: Requirements,
    removed: Option<Component>,
    cascaded: Vec<DeleteCommand>,
}

impl DeleteCommand {
    /// Creates an unfilled delete command; the `"id"` requirement names the
    /// component to remove.
    pub fn new() -> Self {
        let mut requirements = Requirements::new();
        requirements.add("id", ReqKind::Any);

        Self {
            requirements,
            removed: None,
            cascaded: Vec::new(),
        }
    }

    /// Creates a command deleting the component with the given id.
    pub(crate) fn for_id(id: impl Into<String>) -> Self {
        let mut command = Self::new();
        command
            .requirements
            .fulfil("id", id)
            .expect("the id slot accepts any value");
        command
    }

    /// Fulfils the requirement with the given key.
    pub fn fulfil(&mut self, key: &str, value: impl Into<String>) -> Result<(), EditError> {
        self.requirements.fulfil(key, value)
    }
}

impl Default for DeleteCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for DeleteCommand {
    #[tracing::instrument(skip_all, err)]
    fn execute(&mut self, editor: &mut Editor) -> Result<(), EditError> {
        let id = self.requirements.get("id")?.to_owned();

        // branches have no pins, so this cascades only for gates/terminals
        for branch_id in editor.graph().incident_branches(&id)? {
            let mut delete = DeleteCommand::for_id(branch_id);
            delete
                .execute(editor)
                .expect("incident branches are registered");
            self.cascaded.push(delete);
        }

        self.removed = Some(editor.graph_mut().remove(&id)?);
        Ok(())
    }

    fn unexecute(&mut self, editor: &mut Editor) {
        let component = self.removed.take().expect("unexecute follows execute");
        editor
            .graph_mut()
            .add(component)
            .expect("the removed id is free again");

        // reattach incident branches in their original order
        for delete in &mut self.cascaded {
            delete.unexecute(editor);
        }
        self.cascaded.clear();
    }
}
