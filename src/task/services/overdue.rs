//! Overdue sweep: promotes past-due tasks on read.
//!
//! There is no background scheduler. The sweep runs when a caller asks for
//! overdue work, so the promotion is only as fresh as the last request.

use super::lifecycle::{TaskLifecycleResult, TaskLifecycleService, scope_filter};
use crate::identity::Actor;
use crate::task::{
    domain::{Task, TaskStatus},
    ports::{EmployeeDirectory, TaskFilter, TaskRepository, TaskSort},
};
use chrono::{DateTime, Utc};
use mockable::Clock;

impl<R, D, C> TaskLifecycleService<R, D, C>
where
    R: TaskRepository,
    D: EmployeeDirectory,
    C: Clock + Send + Sync,
{
    /// Reports tasks that are past due without changing them.
    ///
    /// Matches the selection of [`Self::overdue_tasks`]: due strictly before
    /// now, not settled, within the actor's scope.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::InactiveActor`] for inactive
    /// accounts or a repository error.
    pub async fn detect_overdue(&self, actor: &Actor) -> TaskLifecycleResult<Vec<Task>> {
        super::lifecycle::ensure_active(actor)?;
        let now = self.clock.utc();
        Ok(self
            .repository
            .query(overdue_filter(actor, now), TaskSort::default())
            .await?)
    }

    /// Promotes past-due tasks to `Overdue` and returns them.
    ///
    /// `now` is captured once so the selection and re-read agree on the
    /// cutoff. Settled tasks are never promoted, and the bulk write leaves
    /// `completed_at` alone. Running the sweep twice is a no-op the second
    /// time for already-promoted tasks.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::InactiveActor`] for inactive
    /// accounts or a repository error.
    pub async fn overdue_tasks(&self, actor: &Actor) -> TaskLifecycleResult<Vec<Task>> {
        super::lifecycle::ensure_active(actor)?;
        let now = self.clock.utc();
        let filter = overdue_filter(actor, now);

        let due = self
            .repository
            .query(filter.clone(), TaskSort::default())
            .await?;
        if due.is_empty() {
            return Ok(Vec::new());
        }

        let pending: Vec<_> = due
            .iter()
            .filter(|task| task.status() != TaskStatus::Overdue)
            .map(Task::id)
            .collect();
        if !pending.is_empty() {
            let promoted = self
                .repository
                .bulk_set_status(&pending, TaskStatus::Overdue, now)
                .await?;
            tracing::debug!(promoted, "promoted past-due tasks to overdue");
        }

        Ok(self.repository.query(filter, TaskSort::default()).await?)
    }
}

fn overdue_filter(actor: &Actor, now: DateTime<Utc>) -> TaskFilter {
    scope_filter(actor).due_before(now).excluding_settled()
}
