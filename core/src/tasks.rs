//! Copy-on-write editing of the task forest.
//!
//! Each operation walks the forest depth first and returns a new forest with
//! fresh nodes along the path to the edited task, or `None` when nothing
//! matched. The input slice is never modified.

use crate::models::{TaskNode, TaskStatus};
use log::debug;
use std::collections::HashSet;

/// One editing request against the forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    Add {
        task: TaskNode,
        parent_id: Option<String>,
    },
    Update {
        task: TaskNode,
    },
    Delete {
        task_id: String,
    },
    SetStatus {
        task_id: String,
        status: TaskStatus,
        cascade: bool,
    },
}

/// Run one command. `None` means the forest is unchanged.
pub fn apply(forest: &[TaskNode], command: &TaskCommand) -> Option<Vec<TaskNode>> {
    let result = match command {
        TaskCommand::Add { task, parent_id } => add_task(forest, task.clone(), parent_id.as_deref()),
        TaskCommand::Update { task } => update_task(forest, task),
        TaskCommand::Delete { task_id } => delete_task(forest, task_id),
        TaskCommand::SetStatus {
            task_id,
            status,
            cascade,
        } => set_task_status(forest, task_id, *status, *cascade),
    };

    if result.is_none() {
        debug!("task command ignored: {:?}", command);
    }
    result
}

/// Find a task anywhere in the forest
pub fn find_task<'a>(forest: &'a [TaskNode], task_id: &str) -> Option<&'a TaskNode> {
    forest.iter().find_map(|task| {
        if task.id == task_id {
            Some(task)
        } else {
            find_task(&task.children, task_id)
        }
    })
}

/// Every id in the forest, depth first
pub fn all_ids(forest: &[TaskNode]) -> Vec<&str> {
    fn walk<'a>(list: &'a [TaskNode], acc: &mut Vec<&'a str>) {
        for task in list {
            acc.push(task.id.as_str());
            walk(&task.children, acc);
        }
    }

    let mut ids = Vec::new();
    walk(forest, &mut ids);
    ids
}

/// Check that no id appears twice anywhere in the forest
pub fn has_unique_ids(forest: &[TaskNode]) -> bool {
    let mut seen = HashSet::new();
    all_ids(forest).into_iter().all(|id| seen.insert(id))
}

/// Drop repeated ids, keeping the first occurrence in depth-first order.
/// A dropped task's children take its place. Returns the repaired forest
/// and how many tasks were dropped.
pub fn dedupe_ids(forest: &[TaskNode]) -> (Vec<TaskNode>, usize) {
    fn walk(list: &[TaskNode], seen: &mut HashSet<String>, dropped: &mut usize) -> Vec<TaskNode> {
        let mut out = Vec::with_capacity(list.len());
        for task in list {
            if seen.insert(task.id.clone()) {
                let mut kept = task.clone();
                kept.children = walk(&task.children, seen, dropped);
                out.push(kept);
            } else {
                *dropped += 1;
                out.extend(walk(&task.children, seen, dropped));
            }
        }
        out
    }

    let mut seen = HashSet::new();
    let mut dropped = 0;
    let repaired = walk(forest, &mut seen, &mut dropped);
    (repaired, dropped)
}

/// Add a task at the root, or as the last child of `parent_id`.
///
/// Rejected when the parent cannot be found or when any id in the new task's
/// subtree is already used in the forest.
pub fn add_task(forest: &[TaskNode], task: TaskNode, parent_id: Option<&str>) -> Option<Vec<TaskNode>> {
    let existing: HashSet<&str> = all_ids(forest).into_iter().collect();
    let incoming = all_ids(std::slice::from_ref(&task));
    let mut seen = HashSet::new();
    if incoming
        .iter()
        .any(|id| existing.contains(id) || !seen.insert(*id))
    {
        return None;
    }

    match parent_id {
        None => {
            let mut next = forest.to_vec();
            next.push(task);
            Some(next)
        }
        Some(parent_id) => rewrite_at(forest, parent_id, &mut |parent: &TaskNode| {
            let mut parent = parent.clone();
            parent.children.push(task.clone());
            parent
        }),
    }
}

/// Replace the task with the same id wholesale, children included.
///
/// Callers changing a single attribute must carry the existing children over
/// themselves. Rejected when the replacement would duplicate an id.
pub fn update_task(forest: &[TaskNode], updated: &TaskNode) -> Option<Vec<TaskNode>> {
    let next = rewrite_at(forest, &updated.id, &mut |_: &TaskNode| updated.clone())?;
    if has_unique_ids(&next) {
        Some(next)
    } else {
        None
    }
}

/// Remove a task and its whole subtree from wherever it lives
pub fn delete_task(forest: &[TaskNode], task_id: &str) -> Option<Vec<TaskNode>> {
    if let Some(index) = forest.iter().position(|task| task.id == task_id) {
        let mut next = forest.to_vec();
        next.remove(index);
        return Some(next);
    }

    forest.iter().enumerate().find_map(|(index, task)| {
        delete_task(&task.children, task_id).map(|children| {
            let mut next = forest.to_vec();
            next[index].children = children;
            next
        })
    })
}

/// Set the status of a task and every one of its descendants
pub fn update_status_recursively(task: &TaskNode, status: TaskStatus) -> TaskNode {
    TaskNode {
        status,
        children: task
            .children
            .iter()
            .map(|child| update_status_recursively(child, status))
            .collect(),
        ..task.clone()
    }
}

/// Change one task's status, optionally cascading to its subtree.
/// Returns `None` when the task is missing or already in that state.
pub fn set_task_status(
    forest: &[TaskNode],
    task_id: &str,
    status: TaskStatus,
    cascade: bool,
) -> Option<Vec<TaskNode>> {
    let current = find_task(forest, task_id)?;
    let updated = if cascade {
        update_status_recursively(current, status)
    } else {
        TaskNode {
            status,
            ..current.clone()
        }
    };

    if &updated == current {
        return None;
    }
    update_task(forest, &updated)
}

/// Share of completed tasks in the subtree, as a whole percentage
pub fn progress(task: &TaskNode) -> u8 {
    fn count(task: &TaskNode) -> (usize, usize) {
        task.children.iter().fold(
            (usize::from(task.is_completed()), 1),
            |(done, total), child| {
                let (d, t) = count(child);
                (done + d, total + t)
            },
        )
    }

    let (done, total) = count(task);
    ((done * 100) / total) as u8
}

/// Rebuild the path down to `task_id`, replacing that node with `edit(node)`
fn rewrite_at(
    list: &[TaskNode],
    task_id: &str,
    edit: &mut dyn FnMut(&TaskNode) -> TaskNode,
) -> Option<Vec<TaskNode>> {
    for (index, task) in list.iter().enumerate() {
        let replacement = if task.id == task_id {
            Some(edit(task))
        } else {
            rewrite_at(&task.children, task_id, edit).map(|children| TaskNode {
                children,
                ..task.clone()
            })
        };

        if let Some(node) = replacement {
            let mut next = list.to_vec();
            next[index] = node;
            return Some(next);
        }
    }
    None
}
