//! Walking and editing the nested task list.

use super::{BranchKey, Task, TaskKind};
use ahash::AHashSet;
use itertools::Itertools;

/// Where an inserted batch of tasks ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Spliced directly before or after the target.
    Adjacent,
    /// The target was a placeholder and was replaced.
    ReplacedPlaceholder,
    /// At the head of the root list.
    Head,
    /// At the tail of the root list, as requested.
    Tail,
    /// At the tail of the root list because the target could not be resolved.
    FallbackTail,
}

/// All tasks in depth-first pre-order, constructs before their children.
pub fn flatten(tasks: &[Task]) -> Vec<&Task> {
    let mut out = Vec::new();
    collect(tasks, &mut out);
    out
}

fn collect<'a>(tasks: &'a [Task], out: &mut Vec<&'a Task>) {
    for task in tasks {
        out.push(task);
        for (_, branch) in task.branches() {
            collect(branch, out);
        }
    }
}

pub fn reference_names(tasks: &[Task]) -> AHashSet<String> {
    flatten(tasks)
        .into_iter()
        .map(|task| task.task_reference_name.clone())
        .collect()
}

/// Reference names that occur more than once, each reported once.
pub fn duplicate_references(tasks: &[Task]) -> Vec<String> {
    flatten(tasks)
        .into_iter()
        .map(|task| task.task_reference_name.clone())
        .duplicates()
        .collect()
}

pub fn find<'a>(tasks: &'a [Task], reference: &str) -> Option<&'a Task> {
    flatten(tasks)
        .into_iter()
        .find(|task| task.task_reference_name == reference)
}

pub fn find_mut<'a>(tasks: &'a mut [Task], reference: &str) -> Option<&'a mut Task> {
    if let Some(index) = tasks.iter().position(|t| t.task_reference_name == reference) {
        return Some(&mut tasks[index]);
    }
    for task in tasks.iter_mut() {
        for (_, branch) in task.branches_mut() {
            if let Some(found) = find_mut(branch, reference) {
                return Some(found);
            }
        }
    }
    None
}

/// The construct that directly owns `reference`.
pub fn parent_of<'a>(tasks: &'a [Task], reference: &str) -> Option<&'a Task> {
    flatten(tasks).into_iter().find(|task| {
        task.branches()
            .iter()
            .any(|(_, branch)| branch.iter().any(|t| t.task_reference_name == reference))
    })
}

/// Fills every empty branch of a construct that requires populated branches
/// with a placeholder from `make_fake`. Returns how many were inserted.
pub fn fill_empty_branches(
    tasks: &mut [Task],
    make_fake: &mut dyn FnMut(&str, &BranchKey) -> Task,
) -> usize {
    let mut filled = 0;
    for task in tasks.iter_mut() {
        task.ensure_default_branches();
        let requires = task.task_type().requires_populated_branches();
        let parent = task.task_reference_name.clone();
        for (key, branch) in task.branches_mut() {
            if requires && branch.is_empty() {
                branch.push(make_fake(&parent, &key));
                filled += 1;
            }
            filled += fill_empty_branches(branch, make_fake);
        }
    }
    filled
}

/// Splices `new_tasks` next to `target`, searching nested branches. Hands the
/// tasks back untouched if the target does not exist.
pub(crate) fn insert_relative(
    list: &mut Vec<Task>,
    target: &str,
    new_tasks: Vec<Task>,
    insert_before: bool,
) -> Result<Placement, Vec<Task>> {
    if let Some(index) = list.iter().position(|t| t.task_reference_name == target) {
        if list[index].is_fake() && !new_tasks.is_empty() {
            let tail = list.split_off(index + 1);
            list.pop();
            list.extend(new_tasks);
            list.extend(tail);
            return Ok(Placement::ReplacedPlaceholder);
        }
        let at = if insert_before { index } else { index + 1 };
        let tail = list.split_off(at);
        list.extend(new_tasks);
        list.extend(tail);
        return Ok(Placement::Adjacent);
    }

    let mut pending = new_tasks;
    for task in list.iter_mut() {
        for (_, branch) in task.branches_mut() {
            match insert_relative(branch, target, pending, insert_before) {
                Ok(placement) => return Ok(placement),
                Err(returned) => pending = returned,
            }
        }
    }
    Err(pending)
}

/// Swaps the task named `target` for `replacement`, returning the old task.
pub(crate) fn replace(list: &mut [Task], target: &str, replacement: Task) -> Result<Task, Task> {
    match find_mut(list, target) {
        Some(slot) => Ok(std::mem::replace(slot, replacement)),
        None => Err(replacement),
    }
}

/// Removes `target` with all of its descendants. A branch that must stay
/// populated and is left empty receives a placeholder from `make_fake`.
pub(crate) fn remove(
    list: &mut Vec<Task>,
    target: &str,
    keep_populated: bool,
    make_fake: &mut dyn FnMut() -> Task,
) -> Option<Task> {
    if let Some(index) = list.iter().position(|t| t.task_reference_name == target) {
        let removed = list.remove(index);
        if keep_populated && list.is_empty() {
            list.push(make_fake());
        }
        return Some(removed);
    }
    for task in list.iter_mut() {
        let requires = task.task_type().requires_populated_branches();
        for (_, branch) in task.branches_mut() {
            if let Some(removed) = remove(branch, target, requires, make_fake) {
                return Some(removed);
            }
        }
    }
    None
}

/// Drops references to removed tasks from every `JOIN`.
pub(crate) fn prune_join_references(tasks: &mut [Task], removed: &AHashSet<String>) {
    for task in tasks.iter_mut() {
        if let TaskKind::Join { join_on } = &mut task.kind {
            join_on.retain(|reference| !removed.contains(reference));
        }
        for (_, branch) in task.branches_mut() {
            prune_join_references(branch, removed);
        }
    }
}
