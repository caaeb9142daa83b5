//! `PostgreSQL` repository implementation for user accounts.

use super::{
    models::{UserRecord, UserRow},
    schema::users,
};
use crate::directory::domain::{
    EmailAddress, EmployeeBadge, PersistedAccountData, PersonName, UserAccount,
};
use crate::directory::ports::{UserRepository, UserRepositoryError, UserRepositoryResult};
use crate::identity::{AccountStatus, OrganizationId, Role, UserId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by directory adapters.
pub type DirectoryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: DirectoryPgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

fn map_unique_violation(err: DieselError, record: &UserRecord) -> UserRepositoryError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) = err {
        match info.constraint_name() {
            Some("users_email_key") => {
                return UserRepositoryError::DuplicateEmail(record.email.clone());
            }
            Some("users_badge_key") => {
                if let Some(badge) = &record.badge {
                    return UserRepositoryError::DuplicateBadge(badge.clone());
                }
            }
            _ => {}
        }
    }
    UserRepositoryError::persistence(err)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, account: &UserAccount) -> UserRepositoryResult<()> {
        let record = to_record(account);

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| map_unique_violation(err, &record))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, account: &UserAccount) -> UserRepositoryResult<()> {
        let account_id = account.id();
        let record = to_record(account);

        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(account_id.into_inner())))
                .set(&record)
                .execute(connection)
                .map_err(|err| map_unique_violation(err, &record))?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(account_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<UserAccount>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserRepositoryResult<Option<UserAccount>> {
        let needle = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(needle))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn badge_exists(&self, badge: &EmployeeBadge) -> UserRepositoryResult<bool> {
        let needle = badge.as_str().to_owned();
        self.run_blocking(move |connection| {
            let count: i64 = users::table
                .filter(users::badge.eq(needle))
                .count()
                .get_result(connection)
                .map_err(UserRepositoryError::persistence)?;
            Ok(count > 0)
        })
        .await
    }

    async fn list_by_organization(
        &self,
        organization: OrganizationId,
        role: Option<Role>,
    ) -> UserRepositoryResult<Vec<UserAccount>> {
        self.run_blocking(move |connection| {
            let mut query = users::table
                .select(UserRow::as_select())
                .filter(users::organization_id.eq(organization.into_inner()))
                .order(users::created_at.asc())
                .into_boxed();
            if let Some(role) = role {
                query = query.filter(users::role.eq(role.as_str()));
            }
            let rows = query
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_account).collect()
        })
        .await
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(users::table.filter(users::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_record(account: &UserAccount) -> UserRecord {
    UserRecord {
        id: account.id().into_inner(),
        first_name: account.first_name().as_str().to_owned(),
        last_name: account.last_name().as_str().to_owned(),
        email: account.email().as_str().to_owned(),
        role: account.role().as_str().to_owned(),
        status: account.status().as_str().to_owned(),
        organization_id: account.organization().into_inner(),
        badge: account.badge().map(|badge| badge.as_str().to_owned()),
        created_at: account.created_at(),
        updated_at: account.updated_at(),
    }
}

fn row_to_account(row: UserRow) -> UserRepositoryResult<UserAccount> {
    let first_name = PersonName::new(row.first_name).map_err(UserRepositoryError::persistence)?;
    let last_name = PersonName::new(row.last_name).map_err(UserRepositoryError::persistence)?;
    let email = EmailAddress::new(row.email).map_err(UserRepositoryError::persistence)?;
    let role = Role::try_from(row.role.as_str()).map_err(UserRepositoryError::persistence)?;
    let status =
        AccountStatus::try_from(row.status.as_str()).map_err(UserRepositoryError::persistence)?;
    let badge = row
        .badge
        .map(EmployeeBadge::new)
        .transpose()
        .map_err(UserRepositoryError::persistence)?;

    Ok(UserAccount::from_persisted(PersistedAccountData {
        id: UserId::from_uuid(row.id),
        first_name,
        last_name,
        email,
        role,
        status,
        organization: OrganizationId::from_uuid(row.organization_id),
        badge,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
