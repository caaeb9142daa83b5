//! `PostgreSQL` repository implementation for organizations.

use super::{
    models::{OrganizationRecord, OrganizationRow},
    schema::organizations,
    users::DirectoryPgPool,
};
use crate::directory::domain::{
    Organization, OrganizationName, OrganizationSlug, PersistedOrganizationData,
};
use crate::directory::ports::{
    OrganizationRepository, OrganizationRepositoryError, OrganizationRepositoryResult,
};
use crate::identity::OrganizationId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed organization repository.
#[derive(Debug, Clone)]
pub struct PostgresOrganizationRepository {
    pool: DirectoryPgPool,
}

impl PostgresOrganizationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> OrganizationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> OrganizationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(OrganizationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(OrganizationRepositoryError::persistence)?
    }
}

fn map_unique_violation(
    err: DieselError,
    record: &OrganizationRecord,
) -> OrganizationRepositoryError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) = err {
        match info.constraint_name() {
            Some("organizations_name_key") => {
                return OrganizationRepositoryError::DuplicateName(record.name.clone());
            }
            Some("organizations_slug_key") => {
                return OrganizationRepositoryError::DuplicateSlug(record.slug.clone());
            }
            _ => {}
        }
    }
    OrganizationRepositoryError::persistence(err)
}

#[async_trait]
impl OrganizationRepository for PostgresOrganizationRepository {
    async fn store(&self, organization: &Organization) -> OrganizationRepositoryResult<()> {
        let record = to_record(organization);

        self.run_blocking(move |connection| {
            diesel::insert_into(organizations::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| map_unique_violation(err, &record))?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: OrganizationId,
    ) -> OrganizationRepositoryResult<Option<Organization>> {
        self.run_blocking(move |connection| {
            let row = organizations::table
                .filter(organizations::id.eq(id.into_inner()))
                .select(OrganizationRow::as_select())
                .first::<OrganizationRow>(connection)
                .optional()
                .map_err(OrganizationRepositoryError::persistence)?;
            row.map(row_to_organization).transpose()
        })
        .await
    }

    async fn find_by_slug(
        &self,
        slug: &OrganizationSlug,
    ) -> OrganizationRepositoryResult<Option<Organization>> {
        let needle = slug.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = organizations::table
                .filter(organizations::slug.eq(needle))
                .select(OrganizationRow::as_select())
                .first::<OrganizationRow>(connection)
                .optional()
                .map_err(OrganizationRepositoryError::persistence)?;
            row.map(row_to_organization).transpose()
        })
        .await
    }

    async fn list(&self) -> OrganizationRepositoryResult<Vec<Organization>> {
        self.run_blocking(move |connection| {
            let rows = organizations::table
                .select(OrganizationRow::as_select())
                .order(organizations::created_at.asc())
                .load::<OrganizationRow>(connection)
                .map_err(OrganizationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_organization).collect()
        })
        .await
    }
}

fn to_record(organization: &Organization) -> OrganizationRecord {
    OrganizationRecord {
        id: organization.id().into_inner(),
        name: organization.name().as_str().to_owned(),
        slug: organization.slug().as_str().to_owned(),
        created_at: organization.created_at(),
        updated_at: organization.updated_at(),
    }
}

fn row_to_organization(row: OrganizationRow) -> OrganizationRepositoryResult<Organization> {
    let name =
        OrganizationName::new(row.name).map_err(OrganizationRepositoryError::persistence)?;
    let slug =
        OrganizationSlug::new(row.slug).map_err(OrganizationRepositoryError::persistence)?;

    Ok(Organization::from_persisted(PersistedOrganizationData {
        id: OrganizationId::from_uuid(row.id),
        name,
        slug,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
