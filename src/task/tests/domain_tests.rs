//! Unit tests for task domain values and the aggregate's status rules.

use crate::identity::{OrganizationId, UserId};
use crate::task::domain::{
    NewTaskData, Task, TaskComment, TaskDescription, TaskDomainError, TaskPriority, TaskStatus,
    TaskTitle,
};
use crate::task::ports::{SortDirection, TaskSort, TaskSortKey};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn task(clock: DefaultClock) -> Result<Task, TaskDomainError> {
    Ok(Task::new(
        NewTaskData {
            title: TaskTitle::new("Quarterly filing")?,
            description: None,
            priority: TaskPriority::default(),
            assigned_to: None,
            created_by: UserId::new(),
            organization: OrganizationId::new(),
            due_date: None,
            tags: Vec::new(),
        },
        &clock,
    ))
}

#[rstest]
#[case("ok", 2)]
#[case("  a  ", 1)]
fn title_shorter_than_three_characters_is_rejected(#[case] input: &str, #[case] length: usize) {
    let result = TaskTitle::new(input);
    assert_eq!(result, Err(TaskDomainError::InvalidTitleLength(length)));
}

#[rstest]
fn title_longer_than_hundred_characters_is_rejected() {
    let input = "x".repeat(101);
    let result = TaskTitle::new(input);
    assert_eq!(result, Err(TaskDomainError::InvalidTitleLength(101)));
}

#[rstest]
fn title_is_trimmed() -> eyre::Result<()> {
    let title = TaskTitle::new("  File the report  ")?;
    ensure!(title.as_str() == "File the report");
    Ok(())
}

#[rstest]
fn description_over_thousand_characters_is_rejected() {
    let input = "y".repeat(1001);
    let result = TaskDescription::new(input);
    assert_eq!(result, Err(TaskDomainError::DescriptionTooLong(1001)));
}

#[rstest]
fn blank_comment_is_rejected(clock: DefaultClock) {
    let result = TaskComment::new("   ", UserId::new(), &clock);
    assert_eq!(result, Err(TaskDomainError::EmptyCommentText));
}

#[rstest]
#[case("todo", TaskStatus::Todo)]
#[case("inprogress", TaskStatus::InProgress)]
#[case("completed", TaskStatus::Completed)]
#[case("approved", TaskStatus::Approved)]
#[case("overdue", TaskStatus::Overdue)]
#[case(" Completed ", TaskStatus::Completed)]
fn status_parses_canonical_strings(#[case] input: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::try_from(input), Ok(expected));
}

#[rstest]
fn status_rejects_unknown_strings() {
    assert!(TaskStatus::try_from("archived").is_err());
}

#[rstest]
fn status_round_trips_through_canonical_form() {
    for status in [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Approved,
        TaskStatus::Overdue,
    ] {
        assert_eq!(TaskStatus::try_from(status.as_str()), Ok(status));
    }
}

#[rstest]
fn priority_orders_low_to_urgent() {
    assert!(TaskPriority::Low < TaskPriority::Medium);
    assert!(TaskPriority::Medium < TaskPriority::High);
    assert!(TaskPriority::High < TaskPriority::Urgent);
    assert_eq!(TaskPriority::default(), TaskPriority::Medium);
}

#[rstest]
#[case("created_at", TaskSortKey::CreatedAt, SortDirection::Ascending)]
#[case("-created_at", TaskSortKey::CreatedAt, SortDirection::Descending)]
#[case("-priority", TaskSortKey::Priority, SortDirection::Descending)]
#[case("due_date", TaskSortKey::DueDate, SortDirection::Ascending)]
#[case("-updated_at", TaskSortKey::UpdatedAt, SortDirection::Descending)]
fn sort_expression_parses_key_and_direction(
    #[case] input: &str,
    #[case] key: TaskSortKey,
    #[case] direction: SortDirection,
) {
    assert_eq!(TaskSort::try_from(input), Ok(TaskSort::new(key, direction)));
}

#[rstest]
fn sort_expression_rejects_unknown_keys() {
    assert!(TaskSort::try_from("-severity").is_err());
}

#[rstest]
fn new_task_starts_todo_without_completion(
    task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let task = task?;
    ensure!(task.status() == TaskStatus::Todo);
    ensure!(task.completed_at().is_none());
    ensure!(task.created_at() == task.updated_at());
    Ok(())
}

#[rstest]
#[case(TaskStatus::Completed, true)]
#[case(TaskStatus::Approved, true)]
#[case(TaskStatus::InProgress, false)]
#[case(TaskStatus::Overdue, false)]
fn entering_status_from_todo_sets_completion_iff_settled(
    clock: DefaultClock,
    task: Result<Task, TaskDomainError>,
    #[case] target: TaskStatus,
    #[case] settled: bool,
) -> eyre::Result<()> {
    let mut task = task?;
    task.set_status(target, &clock);
    ensure!(task.status() == target);
    ensure!(task.completed_at().is_some() == settled);
    Ok(())
}

#[rstest]
fn moving_between_settled_statuses_keeps_the_original_completion_time(
    clock: DefaultClock,
    task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = task?;
    task.set_status(TaskStatus::Completed, &clock);
    let completed_at = task.completed_at();
    ensure!(completed_at.is_some());

    task.set_status(TaskStatus::Approved, &clock);
    ensure!(task.completed_at() == completed_at);
    Ok(())
}

#[rstest]
fn reopening_a_settled_task_clears_completion(
    clock: DefaultClock,
    task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = task?;
    task.set_status(TaskStatus::Approved, &clock);
    ensure!(task.completed_at().is_some());

    task.set_status(TaskStatus::InProgress, &clock);
    ensure!(task.completed_at().is_none());
    Ok(())
}

#[rstest]
#[case(TaskStatus::Todo)]
#[case(TaskStatus::InProgress)]
#[case(TaskStatus::Approved)]
#[case(TaskStatus::Overdue)]
fn approve_is_refused_unless_completed(
    clock: DefaultClock,
    task: Result<Task, TaskDomainError>,
    #[case] current: TaskStatus,
) -> eyre::Result<()> {
    let mut task = task?;
    task.set_status(current, &clock);
    let task_id = task.id();

    let result = task.approve(&clock);
    ensure!(
        result
            == Err(TaskDomainError::ApprovalRequiresCompleted {
                task: task_id,
                status: current,
            })
    );
    ensure!(task.status() == current);
    Ok(())
}

#[rstest]
fn approve_moves_a_completed_task_to_approved(
    clock: DefaultClock,
    task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = task?;
    task.set_status(TaskStatus::Completed, &clock);

    task.approve(&clock)?;
    ensure!(task.status() == TaskStatus::Approved);
    ensure!(task.completed_at().is_some());
    Ok(())
}
