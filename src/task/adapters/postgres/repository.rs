//! `PostgreSQL` repository implementation for task persistence.

use super::{
    models::{TaskRecord, TaskRow},
    schema::tasks,
};
use crate::identity::{OrganizationId, UserId};
use crate::task::{
    domain::{
        PersistedTaskData, Task, TaskComment, TaskDescription, TaskId, TaskPriority, TaskStatus,
        TaskTitle,
    },
    ports::{
        SortDirection, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TaskSort, TaskSortKey,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Integer;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Semantic priority ordering; the column stores the canonical strings.
const PRIORITY_RANK_SQL: &str =
    "CASE priority WHEN 'low' THEN 0 WHEN 'medium' THEN 1 WHEN 'high' THEN 2 \
     WHEN 'urgent' THEN 3 ELSE 4 END";

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let record = to_record(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let record = to_record(task)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&record)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn query(&self, filter: TaskFilter, sort: TaskSort) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = load_rows(connection, &filter, sort)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn bulk_set_status(
        &self,
        ids: &[TaskId],
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<usize> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            diesel::update(tasks::table.filter(tasks::id.eq_any(uuids)))
                .set((
                    tasks::status.eq(status.as_str()),
                    tasks::updated_at.eq(now),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn clear_assignee(
        &self,
        user: UserId,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            diesel::update(tasks::table.filter(tasks::assigned_to.eq(user.into_inner())))
                .set((
                    tasks::assigned_to.eq(None::<uuid::Uuid>),
                    tasks::updated_at.eq(now),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn load_rows(
    connection: &mut PgConnection,
    filter: &TaskFilter,
    sort: TaskSort,
) -> TaskRepositoryResult<Vec<TaskRow>> {
    let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
    if let Some(organization) = filter.organization {
        query = query.filter(tasks::organization_id.eq(organization.into_inner()));
    }
    if let Some(assignee) = filter.assigned_to {
        query = query.filter(tasks::assigned_to.eq(assignee.into_inner()));
    }
    if let Some(status) = filter.status {
        query = query.filter(tasks::status.eq(status.as_str()));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(tasks::priority.eq(priority.as_str()));
    }
    if let Some(cutoff) = filter.due_before {
        query = query.filter(tasks::due_date.lt(cutoff));
    }
    if filter.exclude_settled {
        query = query.filter(tasks::status.ne_all(vec![
            TaskStatus::Completed.as_str(),
            TaskStatus::Approved.as_str(),
        ]));
    }

    query = match (sort.key, sort.direction) {
        (TaskSortKey::CreatedAt, SortDirection::Ascending) => query.order(tasks::created_at.asc()),
        (TaskSortKey::CreatedAt, SortDirection::Descending) => {
            query.order(tasks::created_at.desc())
        }
        (TaskSortKey::UpdatedAt, SortDirection::Ascending) => query.order(tasks::updated_at.asc()),
        (TaskSortKey::UpdatedAt, SortDirection::Descending) => {
            query.order(tasks::updated_at.desc())
        }
        (TaskSortKey::DueDate, SortDirection::Ascending) => query.order(tasks::due_date.asc()),
        (TaskSortKey::DueDate, SortDirection::Descending) => query.order(tasks::due_date.desc()),
        (TaskSortKey::Priority, SortDirection::Ascending) => {
            query.order(sql::<Integer>(PRIORITY_RANK_SQL).asc())
        }
        (TaskSortKey::Priority, SortDirection::Descending) => {
            query.order(sql::<Integer>(PRIORITY_RANK_SQL).desc())
        }
    };

    query
        .load::<TaskRow>(connection)
        .map_err(TaskRepositoryError::persistence)
}

fn to_record(task: &Task) -> TaskRepositoryResult<TaskRecord> {
    let comments =
        serde_json::to_value(task.comments()).map_err(TaskRepositoryError::persistence)?;
    let attachments =
        serde_json::to_value(task.attachments()).map_err(TaskRepositoryError::persistence)?;

    Ok(TaskRecord {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(|value| value.as_str().to_owned()),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        created_by: task.created_by().into_inner(),
        organization_id: task.organization().into_inner(),
        due_date: task.due_date(),
        completed_at: task.completed_at(),
        tags: task.tags().to_vec(),
        comments,
        attachments,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let title = TaskTitle::new(row.title).map_err(TaskRepositoryError::persistence)?;
    let description = row
        .description
        .map(TaskDescription::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority =
        TaskPriority::try_from(row.priority.as_str()).map_err(TaskRepositoryError::persistence)?;
    let comments = serde_json::from_value::<Vec<TaskComment>>(row.comments)
        .map_err(TaskRepositoryError::persistence)?;
    let attachments = serde_json::from_value::<Vec<serde_json::Value>>(row.attachments)
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title,
        description,
        status,
        priority,
        assigned_to: row.assigned_to.map(UserId::from_uuid),
        created_by: UserId::from_uuid(row.created_by),
        organization: OrganizationId::from_uuid(row.organization_id),
        due_date: row.due_date,
        completed_at: row.completed_at,
        tags: row.tags,
        comments,
        attachments,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(Task::from_persisted(data))
}
