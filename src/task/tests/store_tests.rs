//! Tests for the in-memory task repository.

use crate::identity::{OrganizationId, UserId};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{NewTaskData, Task, TaskId, TaskPriority, TaskStatus, TaskTitle},
    ports::{
        SortDirection, TaskFilter, TaskRepository, TaskRepositoryError, TaskSort, TaskSortKey,
    },
};
use chrono::{DateTime, Duration, Utc};
use eyre::{ensure, eyre};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

#[fixture]
fn repository() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

fn seed_task(
    title: &str,
    organization: OrganizationId,
    assignee: Option<UserId>,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
) -> eyre::Result<Task> {
    Ok(Task::new(
        NewTaskData {
            title: TaskTitle::new(title)?,
            description: None,
            priority,
            assigned_to: assignee,
            created_by: UserId::new(),
            organization,
            due_date,
            tags: Vec::new(),
        },
        &DefaultClock,
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_and_find_round_trip(repository: InMemoryTaskRepository) -> eyre::Result<()> {
    let task = seed_task(
        "Round trip",
        OrganizationId::new(),
        None,
        TaskPriority::Medium,
        None,
    )?;

    repository.store(&task).await?;
    let fetched = repository.find_by_id(task.id()).await?;

    ensure!(fetched == Some(task));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn storing_the_same_id_twice_is_a_duplicate(
    repository: InMemoryTaskRepository,
) -> eyre::Result<()> {
    let task = seed_task(
        "Stored once",
        OrganizationId::new(),
        None,
        TaskPriority::Medium,
        None,
    )?;
    repository.store(&task).await?;

    let result = repository.store(&task).await;

    ensure!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_and_delete_report_missing_tasks(
    repository: InMemoryTaskRepository,
) -> eyre::Result<()> {
    let task = seed_task(
        "Never stored",
        OrganizationId::new(),
        None,
        TaskPriority::Medium,
        None,
    )?;

    let update = repository.update(&task).await;
    ensure!(matches!(update, Err(TaskRepositoryError::NotFound(_))));

    let delete = repository.delete(TaskId::new()).await;
    ensure!(matches!(delete, Err(TaskRepositoryError::NotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn query_scopes_by_organization_and_assignee(
    repository: InMemoryTaskRepository,
) -> eyre::Result<()> {
    let organization = OrganizationId::new();
    let other_organization = OrganizationId::new();
    let assignee = UserId::new();

    let assigned = seed_task(
        "Assigned here",
        organization,
        Some(assignee),
        TaskPriority::Medium,
        None,
    )?;
    let unassigned = seed_task(
        "Unassigned here",
        organization,
        None,
        TaskPriority::Medium,
        None,
    )?;
    let elsewhere = seed_task(
        "Different tenant",
        other_organization,
        None,
        TaskPriority::Medium,
        None,
    )?;
    for task in [&assigned, &unassigned, &elsewhere] {
        repository.store(task).await?;
    }

    let by_organization = repository
        .query(
            TaskFilter::new().in_organization(organization),
            TaskSort::default(),
        )
        .await?;
    ensure!(by_organization.len() == 2);
    ensure!(by_organization.iter().all(|t| t.organization() == organization));

    let by_assignee = repository
        .query(TaskFilter::new().assigned_to(assignee), TaskSort::default())
        .await?;
    ensure!(by_assignee.len() == 1);
    ensure!(by_assignee[0].id() == assigned.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn query_orders_by_due_date_with_undated_last(
    repository: InMemoryTaskRepository,
) -> eyre::Result<()> {
    let organization = OrganizationId::new();
    let soon = seed_task(
        "Due soon",
        organization,
        None,
        TaskPriority::Medium,
        Some(Utc::now() + Duration::days(1)),
    )?;
    let later = seed_task(
        "Due later",
        organization,
        None,
        TaskPriority::Medium,
        Some(Utc::now() + Duration::days(10)),
    )?;
    let undated = seed_task("No deadline", organization, None, TaskPriority::Medium, None)?;
    for task in [&undated, &later, &soon] {
        repository.store(task).await?;
    }

    let ordered = repository
        .query(
            TaskFilter::new().in_organization(organization),
            TaskSort::new(TaskSortKey::DueDate, SortDirection::Ascending),
        )
        .await?;

    let ids: Vec<TaskId> = ordered.iter().map(Task::id).collect();
    ensure!(ids == [soon.id(), later.id(), undated.id()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn query_orders_by_priority(repository: InMemoryTaskRepository) -> eyre::Result<()> {
    let organization = OrganizationId::new();
    let low = seed_task("Low", organization, None, TaskPriority::Low, None)?;
    let urgent = seed_task("Urgent", organization, None, TaskPriority::Urgent, None)?;
    let high = seed_task("High", organization, None, TaskPriority::High, None)?;
    for task in [&low, &urgent, &high] {
        repository.store(task).await?;
    }

    let ordered = repository
        .query(
            TaskFilter::new().in_organization(organization),
            TaskSort::new(TaskSortKey::Priority, SortDirection::Descending),
        )
        .await?;

    let priorities: Vec<TaskPriority> = ordered.iter().map(Task::priority).collect();
    ensure!(priorities == [TaskPriority::Urgent, TaskPriority::High, TaskPriority::Low]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_set_status_skips_missing_ids(
    repository: InMemoryTaskRepository,
) -> eyre::Result<()> {
    let organization = OrganizationId::new();
    let first = seed_task("First", organization, None, TaskPriority::Medium, None)?;
    let second = seed_task("Second", organization, None, TaskPriority::Medium, None)?;
    repository.store(&first).await?;
    repository.store(&second).await?;
    let now = DefaultClock.utc();

    let updated = repository
        .bulk_set_status(
            &[first.id(), second.id(), TaskId::new()],
            TaskStatus::Overdue,
            now,
        )
        .await?;

    ensure!(updated == 2);
    let reread = repository
        .find_by_id(first.id())
        .await?
        .ok_or_else(|| eyre!("task disappeared"))?;
    ensure!(reread.status() == TaskStatus::Overdue);
    ensure!(reread.updated_at() == now);
    ensure!(reread.completed_at().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clear_assignee_unassigns_every_matching_task(
    repository: InMemoryTaskRepository,
) -> eyre::Result<()> {
    let organization = OrganizationId::new();
    let leaver = UserId::new();
    let stayer = UserId::new();
    for title in ["One", "Two", "Three"] {
        let task = seed_task(title, organization, Some(leaver), TaskPriority::Medium, None)?;
        repository.store(&task).await?;
    }
    let kept = seed_task("Kept", organization, Some(stayer), TaskPriority::Medium, None)?;
    repository.store(&kept).await?;

    let cleared = repository.clear_assignee(leaver, DefaultClock.utc()).await?;

    ensure!(cleared == 3);
    let orphaned = repository
        .query(TaskFilter::new().assigned_to(leaver), TaskSort::default())
        .await?;
    ensure!(orphaned.is_empty());
    let unaffected = repository
        .query(TaskFilter::new().assigned_to(stayer), TaskSort::default())
        .await?;
    ensure!(unaffected.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn query_combines_due_cutoff_with_settled_exclusion(
    repository: InMemoryTaskRepository,
) -> eyre::Result<()> {
    let organization = OrganizationId::new();
    let cutoff = Utc::now();
    let late = seed_task(
        "Late and open",
        organization,
        None,
        TaskPriority::Medium,
        Some(cutoff - Duration::days(1)),
    )?;
    let mut settled = seed_task(
        "Late but done",
        organization,
        None,
        TaskPriority::Medium,
        Some(cutoff - Duration::days(1)),
    )?;
    settled.set_status(TaskStatus::Completed, &DefaultClock);
    let future = seed_task(
        "Not yet due",
        organization,
        None,
        TaskPriority::Medium,
        Some(cutoff + Duration::days(1)),
    )?;
    for task in [&late, &settled, &future] {
        repository.store(task).await?;
    }

    let matched = repository
        .query(
            TaskFilter::new()
                .in_organization(organization)
                .due_before(cutoff)
                .excluding_settled(),
            TaskSort::default(),
        )
        .await?;

    ensure!(matched.len() == 1);
    ensure!(matched[0].id() == late.id());
    Ok(())
}
