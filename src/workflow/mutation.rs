//! Edits to the task list. Each successful edit rebuilds the graph.

use super::{VinesCore, is_boundary_marker, normalize};
use crate::error::MutationError;
use crate::graph::{WORKFLOW_END, WORKFLOW_START};
use crate::id::reference_name;
use crate::task::tree::{self, Placement};
use crate::task::{FAKE_NODE_NAME, Task};
use ahash::AHashSet;

/// Result of [`VinesCore::insert_node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    pub placement: Placement,
    /// Reference names of the inserted top-level tasks, after any re-keying.
    pub inserted: Vec<String>,
}

impl VinesCore {
    /// Splices `tasks` next to `target`.
    ///
    /// `workflow_start` always inserts at the head and `workflow_end` at the
    /// tail. An unknown target does not fail: the tasks are appended just
    /// before the end marker and the outcome reports [`Placement::FallbackTail`].
    /// Reference names that collide with existing ones are regenerated.
    pub fn insert_node(
        &mut self,
        target: &str,
        mut tasks: Vec<Task>,
        insert_before: bool,
    ) -> InsertOutcome {
        let mut taken = tree::reference_names(&self.tasks);
        taken.insert(WORKFLOW_START.to_string());
        taken.insert(WORKFLOW_END.to_string());
        self.rekey(&mut tasks, &mut taken);
        normalize(&mut tasks, self.ids.as_mut());

        let inserted: Vec<String> = tasks
            .iter()
            .map(|task| task.task_reference_name.clone())
            .collect();

        let placement = if target == WORKFLOW_START {
            let tail = std::mem::take(&mut self.tasks);
            self.tasks = tasks;
            self.tasks.extend(tail);
            Placement::Head
        } else if target == WORKFLOW_END {
            self.tasks.extend(tasks);
            Placement::Tail
        } else {
            match tree::insert_relative(&mut self.tasks, target, tasks, insert_before) {
                Ok(placement) => placement,
                Err(tasks) => {
                    log::warn!(
                        "Insert target '{}' not found in '{}'; appending before {}",
                        target,
                        self.workflow_id,
                        WORKFLOW_END
                    );
                    self.tasks.extend(tasks);
                    Placement::FallbackTail
                }
            }
        };

        self.rebuild();
        InsertOutcome {
            placement,
            inserted,
        }
    }

    /// Inserts a single task.
    pub fn insert_task(&mut self, target: &str, task: Task, insert_before: bool) -> InsertOutcome {
        self.insert_node(target, vec![task], insert_before)
    }

    /// Regenerates any reference name in `tasks` (nested ones included) that
    /// is already in `taken`.
    fn rekey(&mut self, tasks: &mut [Task], taken: &mut AHashSet<String>) {
        for task in tasks.iter_mut() {
            if taken.contains(&task.task_reference_name) {
                let prefix = if task.is_fake() {
                    FAKE_NODE_NAME.to_string()
                } else {
                    task.name.clone()
                };
                let mut fresh = reference_name(&prefix, self.ids.as_mut());
                while taken.contains(&fresh) {
                    fresh = reference_name(&prefix, self.ids.as_mut());
                }
                log::warn!(
                    "Reference '{}' already in use; renamed to '{}'",
                    task.task_reference_name,
                    fresh
                );
                task.task_reference_name = fresh;
            }
            taken.insert(task.task_reference_name.clone());
            for (_, branch) in task.branches_mut() {
                self.rekey(branch, taken);
            }
        }
    }

    /// Replaces the task at `node_id` wholesale and rebuilds.
    ///
    /// The replacement may carry a different reference name, as long as it
    /// does not clash with a task outside the replaced subtree. Join lists
    /// lose any reference that disappeared with the old subtree. With
    /// `trigger_persist` the new state is handed to the persistence sink.
    pub fn update_raw(
        &mut self,
        node_id: &str,
        mut task: Task,
        trigger_persist: bool,
    ) -> Result<(), MutationError> {
        if is_boundary_marker(node_id) {
            return Err(MutationError::ReservedNode(node_id.to_string()));
        }
        let old = tree::find(&self.tasks, node_id)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
        let old_refs = tree::reference_names(std::slice::from_ref(old));

        let mut outside = tree::reference_names(&self.tasks);
        outside.retain(|reference| !old_refs.contains(reference));
        for reference in tree::flatten(std::slice::from_ref(&task))
            .into_iter()
            .map(|t| &t.task_reference_name)
        {
            if is_boundary_marker(reference) {
                return Err(MutationError::ReservedNode(reference.clone()));
            }
            if outside.contains(reference) {
                return Err(MutationError::DuplicateReference(reference.clone()));
            }
        }
        if let Some(duplicate) = tree::duplicate_references(std::slice::from_ref(&task))
            .into_iter()
            .next()
        {
            return Err(MutationError::DuplicateReference(duplicate));
        }

        normalize(std::slice::from_mut(&mut task), self.ids.as_mut());
        let new_refs = tree::reference_names(std::slice::from_ref(&task));
        if tree::replace(&mut self.tasks, node_id, task).is_err() {
            return Err(MutationError::NodeNotFound(node_id.to_string()));
        }

        let gone: AHashSet<String> = old_refs.difference(&new_refs).cloned().collect();
        if !gone.is_empty() {
            tree::prune_join_references(&mut self.tasks, &gone);
        }

        self.rebuild();
        if trigger_persist {
            self.persist();
        }
        Ok(())
    }

    /// Like [`update_raw`](Self::update_raw), parsing the replacement from
    /// JSON first. Malformed input leaves everything unchanged.
    pub fn update_raw_json(
        &mut self,
        node_id: &str,
        json: &str,
        trigger_persist: bool,
    ) -> Result<(), MutationError> {
        let task: Task =
            serde_json::from_str(json).map_err(|e| MutationError::MalformedTask {
                node_id: node_id.to_string(),
                message: e.to_string(),
            })?;
        self.update_raw(node_id, task, trigger_persist)
    }

    /// Deletes `node_id` and everything nested in it.
    ///
    /// A branch left empty receives a fresh placeholder, so constructs never
    /// end up with an empty branch. Boundary markers and unknown ids return
    /// `None` and change nothing.
    pub fn remove_node(&mut self, node_id: &str) -> Option<Task> {
        if is_boundary_marker(node_id) {
            log::warn!("Refusing to remove boundary marker '{}'", node_id);
            return None;
        }
        let ids = self.ids.as_mut();
        let removed = tree::remove(&mut self.tasks, node_id, false, &mut || {
            Task::fake(reference_name(FAKE_NODE_NAME, &mut *ids))
        })?;

        let gone = tree::reference_names(std::slice::from_ref(&removed));
        tree::prune_join_references(&mut self.tasks, &gone);
        normalize(&mut self.tasks, self.ids.as_mut());

        self.rebuild();
        Some(removed)
    }
}
