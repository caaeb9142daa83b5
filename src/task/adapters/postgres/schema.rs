//! Diesel schema for task persistence.

diesel::table! {
    /// Task records scoped by organization.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 100]
        title -> Varchar,
        /// Optional task description.
        description -> Nullable<Text>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional assignee.
        assigned_to -> Nullable<Uuid>,
        /// Admin who created the task.
        created_by -> Uuid,
        /// Owning organization.
        organization_id -> Uuid,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Completion timestamp; set exactly for completed/approved tasks.
        completed_at -> Nullable<Timestamptz>,
        /// Free-form tags.
        tags -> Array<Text>,
        /// Comment payloads.
        comments -> Jsonb,
        /// Opaque attachment metadata.
        attachments -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
