//! Service tests for full updates and their per-role field permissions.

use super::support::{Workspace, workspace};
use crate::identity::UserId;
use crate::task::{
    domain::{TaskDomainError, TaskPriority, TaskStatus},
    services::{
        AdminTaskUpdate, CommentDraft, CreateTaskRequest, TaskEdits, TaskLifecycleError,
        TaskUpdate,
    },
};
use chrono::{Duration, Utc};
use eyre::ensure;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_update_touches_every_field_class() -> eyre::Result<()> {
    let Workspace {
        service,
        admin,
        employee,
    } = workspace();
    let created = service
        .create_task(&admin, CreateTaskRequest::new("Initial title"))
        .await?;
    let due_date = Utc::now() + Duration::days(7);

    let update = AdminTaskUpdate::new()
        .with_edits(
            TaskEdits::new()
                .with_title("Revised title")
                .with_description("Now with context")
                .with_priority(TaskPriority::Urgent)
                .with_tags(vec!["q3".to_owned()]),
        )
        .reassign_to(employee.id())
        .with_due_date(due_date)
        .with_status(TaskStatus::InProgress);

    let updated = service
        .update_task(&admin, created.id(), TaskUpdate::Admin(update))
        .await?;

    ensure!(updated.title().as_str() == "Revised title");
    ensure!(updated.description().is_some_and(|d| d.as_str() == "Now with context"));
    ensure!(updated.priority() == TaskPriority::Urgent);
    ensure!(updated.tags() == ["q3".to_owned()]);
    ensure!(updated.assigned_to() == Some(employee.id()));
    ensure!(updated.due_date() == Some(due_date));
    ensure!(updated.status() == TaskStatus::InProgress);

    let persisted = service.get_task(&admin, created.id()).await?;
    ensure!(persisted == updated);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employee_update_cannot_move_assignment_status_or_due_date() -> eyre::Result<()> {
    let Workspace {
        service,
        admin,
        employee,
    } = workspace();
    let due_date = Utc::now() + Duration::days(3);
    let created = service
        .create_task(
            &admin,
            CreateTaskRequest::new("Employee-editable task")
                .with_assignee(employee.id())
                .with_due_date(due_date),
        )
        .await?;

    let edits = TaskEdits::new()
        .with_title("Renamed by the assignee")
        .with_priority(TaskPriority::Low);
    let updated = service
        .update_task(&employee, created.id(), TaskUpdate::Employee(edits))
        .await?;

    ensure!(updated.title().as_str() == "Renamed by the assignee");
    ensure!(updated.priority() == TaskPriority::Low);
    // The restricted payload has no way to express these changes.
    ensure!(updated.assigned_to() == Some(employee.id()));
    ensure!(updated.status() == created.status());
    ensure!(updated.due_date() == Some(due_date));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_payload_must_match_the_actor_role() -> eyre::Result<()> {
    let Workspace {
        service,
        admin,
        employee,
    } = workspace();
    let created = service
        .create_task(
            &admin,
            CreateTaskRequest::new("Role-checked task").with_assignee(employee.id()),
        )
        .await?;

    let admin_with_employee_payload = service
        .update_task(
            &admin,
            created.id(),
            TaskUpdate::Employee(TaskEdits::new().with_title("Mismatched")),
        )
        .await;
    ensure!(matches!(
        admin_with_employee_payload,
        Err(TaskLifecycleError::RoleMismatch)
    ));

    let employee_with_admin_payload = service
        .update_task(
            &employee,
            created.id(),
            TaskUpdate::Admin(AdminTaskUpdate::new().with_status(TaskStatus::Approved)),
        )
        .await;
    ensure!(matches!(
        employee_with_admin_payload,
        Err(TaskLifecycleError::RoleMismatch)
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_stamps_submitted_comments() -> eyre::Result<()> {
    let Workspace {
        service,
        admin,
        employee,
    } = workspace();
    let created = service
        .create_task(
            &admin,
            CreateTaskRequest::new("Commented task").with_assignee(employee.id()),
        )
        .await?;

    let edits = TaskEdits::new().with_comments(vec![CommentDraft::new(
        "Blocked on the vendor",
        employee.id(),
    )]);
    let updated = service
        .update_task(&employee, created.id(), TaskUpdate::Employee(edits))
        .await?;

    ensure!(updated.comments().len() == 1);
    ensure!(updated.comments()[0].text() == "Blocked on the vendor");
    ensure!(updated.comments()[0].author() == employee.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_blank_comments() -> eyre::Result<()> {
    let Workspace {
        service,
        admin,
        employee,
    } = workspace();
    let created = service
        .create_task(
            &admin,
            CreateTaskRequest::new("Commented task").with_assignee(employee.id()),
        )
        .await?;

    let edits = TaskEdits::new().with_comments(vec![CommentDraft::new("   ", employee.id())]);
    let result = service
        .update_task(&employee, created.id(), TaskUpdate::Employee(edits))
        .await;

    ensure!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::EmptyCommentText))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_checks_directory_eligibility() -> eyre::Result<()> {
    let Workspace { service, admin, .. } = workspace();
    let created = service
        .create_task(&admin, CreateTaskRequest::new("Reassignment target"))
        .await?;
    let outsider = UserId::new();

    let result = service
        .update_task(
            &admin,
            created.id(),
            TaskUpdate::Admin(AdminTaskUpdate::new().reassign_to(outsider)),
        )
        .await;

    ensure!(matches!(
        result,
        Err(TaskLifecycleError::IneligibleAssignee(user)) if user == outsider
    ));
    let untouched = service.get_task(&admin, created.id()).await?;
    ensure!(untouched.assigned_to().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_status_change_through_update_sets_completion() -> eyre::Result<()> {
    let Workspace { service, admin, .. } = workspace();
    let created = service
        .create_task(&admin, CreateTaskRequest::new("Finished by update"))
        .await?;

    let updated = service
        .update_task(
            &admin,
            created.id(),
            TaskUpdate::Admin(AdminTaskUpdate::new().with_status(TaskStatus::Completed)),
        )
        .await?;

    ensure!(updated.status() == TaskStatus::Completed);
    ensure!(updated.completed_at().is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employee_cannot_update_an_unassigned_task() -> eyre::Result<()> {
    let Workspace {
        service,
        admin,
        employee,
    } = workspace();
    let created = service
        .create_task(&admin, CreateTaskRequest::new("Belongs to nobody yet"))
        .await?;

    let result = service
        .update_task(
            &employee,
            created.id(),
            TaskUpdate::Employee(TaskEdits::new().with_title("Grabbed")),
        )
        .await;

    ensure!(matches!(
        result,
        Err(TaskLifecycleError::NotAssignee { .. })
    ));
    Ok(())
}
