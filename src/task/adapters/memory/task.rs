//! In-memory task repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::identity::{OrganizationId, UserId};
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{
        SortDirection, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TaskSort, TaskSortKey,
    },
};

/// Thread-safe in-memory task repository.
///
/// Keeps secondary indexes by organization and assignee, mirroring the
/// compound indexes a database adapter would rely on for scoped queries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    organization_index: HashMap<OrganizationId, HashSet<TaskId>>,
    assignee_index: HashMap<UserId, HashSet<TaskId>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn index_task(state: &mut InMemoryTaskState, task: &Task) {
    state
        .organization_index
        .entry(task.organization())
        .or_default()
        .insert(task.id());
    if let Some(assignee) = task.assigned_to() {
        state
            .assignee_index
            .entry(assignee)
            .or_default()
            .insert(task.id());
    }
}

fn unindex_assignee(state: &mut InMemoryTaskState, task_id: TaskId, assignee: UserId) {
    if let Some(ids) = state.assignee_index.get_mut(&assignee) {
        ids.remove(&task_id);
        if ids.is_empty() {
            state.assignee_index.remove(&assignee);
        }
    }
}

fn compare_tasks(a: &Task, b: &Task, sort: TaskSort) -> Ordering {
    let ordering = match sort.key {
        TaskSortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
        TaskSortKey::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
        // Undated tasks order as later than any dated task.
        TaskSortKey::DueDate => match (a.due_date(), b.due_date()) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        TaskSortKey::Priority => a.priority().cmp(&b.priority()),
    };
    match sort.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn read_state<T>(
    state: &Arc<RwLock<InMemoryTaskState>>,
    f: impl FnOnce(&InMemoryTaskState) -> T,
) -> TaskRepositoryResult<T> {
    let guard = state
        .read()
        .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
    Ok(f(&guard))
}

fn write_state<T>(
    state: &Arc<RwLock<InMemoryTaskState>>,
    f: impl FnOnce(&mut InMemoryTaskState) -> TaskRepositoryResult<T>,
) -> TaskRepositoryResult<T> {
    let mut guard = state
        .write()
        .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
    f(&mut guard)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        write_state(&self.state, |state| {
            if state.tasks.contains_key(&task.id()) {
                return Err(TaskRepositoryError::DuplicateTask(task.id()));
            }
            index_task(state, task);
            state.tasks.insert(task.id(), task.clone());
            Ok(())
        })
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        write_state(&self.state, |state| {
            let previous = state
                .tasks
                .get(&task.id())
                .ok_or(TaskRepositoryError::NotFound(task.id()))?
                .clone();

            if let Some(old_assignee) = previous.assigned_to() {
                if previous.assigned_to() != task.assigned_to() {
                    unindex_assignee(state, task.id(), old_assignee);
                }
            }
            index_task(state, task);
            state.tasks.insert(task.id(), task.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        read_state(&self.state, |state| state.tasks.get(&id).cloned())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        write_state(&self.state, |state| {
            let task = state
                .tasks
                .remove(&id)
                .ok_or(TaskRepositoryError::NotFound(id))?;
            if let Some(ids) = state.organization_index.get_mut(&task.organization()) {
                ids.remove(&id);
            }
            if let Some(assignee) = task.assigned_to() {
                unindex_assignee(state, id, assignee);
            }
            Ok(())
        })
    }

    async fn query(&self, filter: TaskFilter, sort: TaskSort) -> TaskRepositoryResult<Vec<Task>> {
        read_state(&self.state, |state| {
            let candidates: Vec<&Task> = if let Some(assignee) = filter.assigned_to {
                state
                    .assignee_index
                    .get(&assignee)
                    .map(|ids| ids.iter().filter_map(|id| state.tasks.get(id)).collect())
                    .unwrap_or_default()
            } else if let Some(organization) = filter.organization {
                state
                    .organization_index
                    .get(&organization)
                    .map(|ids| ids.iter().filter_map(|id| state.tasks.get(id)).collect())
                    .unwrap_or_default()
            } else {
                state.tasks.values().collect()
            };

            let mut matched: Vec<Task> = candidates
                .into_iter()
                .filter(|task| filter.matches(task))
                .cloned()
                .collect();
            matched.sort_by(|a, b| compare_tasks(a, b, sort));
            matched
        })
    }

    async fn bulk_set_status(
        &self,
        ids: &[TaskId],
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<usize> {
        write_state(&self.state, |state| {
            let mut updated = 0;
            for id in ids {
                if let Some(task) = state.tasks.get_mut(id) {
                    task.force_status(status, now);
                    updated += 1;
                }
            }
            Ok(updated)
        })
    }

    async fn clear_assignee(
        &self,
        user: UserId,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<usize> {
        write_state(&self.state, |state| {
            let ids = state.assignee_index.remove(&user).unwrap_or_default();
            let mut updated = 0;
            for id in &ids {
                if let Some(task) = state.tasks.get_mut(id) {
                    task.drop_assignee(now);
                    updated += 1;
                }
            }
            Ok(updated)
        })
    }
}
