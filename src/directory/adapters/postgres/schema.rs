//! Diesel schema for directory persistence.

diesel::table! {
    /// User accounts, one row per registered person.
    users (id) {
        /// Account identifier.
        id -> Uuid,
        /// Given name.
        #[max_length = 30]
        first_name -> Varchar,
        /// Family name.
        #[max_length = 30]
        last_name -> Varchar,
        /// Unique login email.
        #[max_length = 255]
        email -> Varchar,
        /// Account role.
        #[max_length = 20]
        role -> Varchar,
        /// Approval status.
        #[max_length = 20]
        status -> Varchar,
        /// Owning organization.
        organization_id -> Uuid,
        /// Unique badge; assigned on approval.
        #[max_length = 6]
        badge -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tenant organizations.
    organizations (id) {
        /// Organization identifier.
        id -> Uuid,
        /// Unique display name.
        #[max_length = 100]
        name -> Varchar,
        /// Unique public registration slug.
        #[max_length = 120]
        slug -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
