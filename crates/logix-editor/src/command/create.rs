use logix_circuits::{CircuitError, Component, ComponentType};

use crate::{
    command::{Command, DeleteCommand, EditError},
    editor::Editor,
    requirement::{name_pattern, ReqKind, Requirements},
};

/// Creates a component and registers it with the editor's graph.
///
/// Branch creation may displace the destination pin's previous incoming
/// branch; the command then synthesizes an inner delete command for the
/// displaced branch and keeps it, so that undo can restore the displaced
/// branch before removing the created one.
#[derive(Debug)]
pub struct CreateCommand {
    ctype: ComponentType,
    requirements: Requirements,
    /// The created component while it is out of the graph, after an undo.
    retained: Option<Component>,
    created_id: Option<String>,
    compensating: Vec<DeleteCommand>,
}

impl CreateCommand {
    /// Creates a command producing components of the given category.
    ///
    /// Every category requires a `"name"`; a gate additionally requires a
    /// `"pin count"`, and a branch its four endpoint parameters. An
    /// unfulfilled name is generated from the editor's per-category sequence
    /// at execution time.
    pub fn new(ctype: ComponentType) -> Self {
        let mut requirements = Requirements::new();
        match ctype {
            ComponentType::Branch => {
                requirements.add("source id", ReqKind::Any);
                requirements.add("source index", ReqKind::NonNegInteger);
                requirements.add("dest id", ReqKind::Any);
                requirements.add("dest index", ReqKind::NonNegInteger);
            }
            ComponentType::Gate(_) => {
                requirements.add("pin count", ReqKind::PosInteger);
            }
            ComponentType::Input | ComponentType::Output => {}
        }
        requirements.add("name", ReqKind::Custom(name_pattern().clone()));

        Self {
            ctype,
            requirements,
            retained: None,
            created_id: None,
            compensating: Vec::new(),
        }
    }

    /// Fulfils the requirement with the given key.
    pub fn fulfil(&mut self, key: &str, value: impl Into<String>) -> Result<(), EditError> {
        self.requirements.fulfil(key, value)
    }

    /// Returns the requirements of the command.
    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    /// Returns the id of the created component, once executed.
    pub fn created_id(&self) -> Option<&str> {
        self.created_id.as_deref()
    }

    fn name(&self, editor: &mut Editor) -> Result<String, EditError> {
        match self.requirements.get("name") {
            Ok(name) => Ok(name.to_owned()),
            Err(EditError::Unfilled(_)) => Ok(editor.next_id(self.ctype)),
            Err(err) => Err(err),
        }
    }
}

impl Command for CreateCommand {
    #[tracing::instrument(skip_all, fields(kind = %self.ctype), err)]
    fn execute(&mut self, editor: &mut Editor) -> Result<(), EditError> {
        if let Some(component) = self.retained.take() {
            // redo: restore the previously created component
            editor.graph_mut().add(component)?;
        } else if let Some(id) = &self.created_id {
            // executed and never undone; the component is still registered
            return Err(CircuitError::DuplicateId(id.clone()).into());
        } else {
            let component = match self.ctype {
                ComponentType::Input => Component::input(self.name(editor)?),
                ComponentType::Output => Component::output(self.name(editor)?),
                ComponentType::Gate(op) => {
                    let pairs = self.requirements.get_usize("pin count")?;
                    Component::gate(self.name(editor)?, op, pairs)
                }
                ComponentType::Branch => {
                    let source = self.requirements.get("source id")?.to_owned();
                    let source_index = self.requirements.get_usize("source index")?;
                    let dest = self.requirements.get("dest id")?.to_owned();
                    let dest_index = self.requirements.get_usize("dest index")?;

                    editor.graph().get(&source)?;
                    editor.graph().get(&dest)?;

                    /*
                     * If connecting the branch would close a feedback
                     * cycle, the connection is aborted here, before the
                     * connection itself has been validated. A cycle report
                     * can therefore mask a connection that was never
                     * structurally valid in the first place. Checking in
                     * the other order would require creating the branch
                     * and rolling it back on failure; both are error cases
                     * that abort the command identically.
                     */
                    if !editor.graph().can_connect(&source, &dest) {
                        return Err(CircuitError::Cycle { source, dest }.into());
                    }

                    Component::branch(self.name(editor)?, source, source_index, dest, dest_index)
                }
            };

            let id = component.id().to_owned();
            editor.graph_mut().add(component)?;
            self.created_id = Some(id);
        }

        if self.ctype == ComponentType::Branch {
            // collect the branch that may have been displaced by this one;
            // a single insertion can never displace more than one
            let displaced = editor.graph_mut().take_displaced();
            assert!(
                displaced.len() <= 1,
                "a single branch creation displaced more than one branch"
            );

            for id in displaced {
                let mut delete = DeleteCommand::for_id(id);
                delete
                    .execute(editor)
                    .expect("the displaced branch is still registered");
                self.compensating.push(delete);
            }
        }

        Ok(())
    }

    fn unexecute(&mut self, editor: &mut Editor) {
        // restore displaced branches before removing the created component
        for delete in &mut self.compensating {
            delete.unexecute(editor);
        }
        self.compensating.clear();

        if let Some(id) = &self.created_id {
            let removed = editor
                .graph_mut()
                .remove(id)
                .expect("the created component is still registered");
            // restoring a displaced branch re-displaces the branch this
            // command created; discard that notification
            editor.graph_mut().take_displaced();
            self.retained = Some(removed);
        }
    }
}
