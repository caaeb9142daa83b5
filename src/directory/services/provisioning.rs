//! Organization provisioning: bootstrap of a tenant and its founding admin.

use crate::directory::domain::{
    AccountProfile, DirectoryDomainError, EmailAddress, Organization, OrganizationName,
    OrganizationSlug, PersonName, UserAccount,
};
use crate::directory::ports::{
    OrganizationRepository, OrganizationRepositoryError, UserRepository, UserRepositoryError,
};
use crate::error::ErrorKind;
use mockable::Clock;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::sync::Arc;
use thiserror::Error;

/// Attempts at finding a free slug before giving up.
const MAX_SLUG_ATTEMPTS: usize = 5;

/// Request payload for provisioning an organization.
///
/// Provisioning is the unauthenticated bootstrap: there is no actor yet, so
/// the founder becomes the organization's first active admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrganizationRequest {
    pub(crate) name: String,
    pub(crate) founder_first_name: String,
    pub(crate) founder_last_name: String,
    pub(crate) founder_email: String,
}

impl CreateOrganizationRequest {
    /// Creates a provisioning request.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        founder_first_name: impl Into<String>,
        founder_last_name: impl Into<String>,
        founder_email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            founder_first_name: founder_first_name.into(),
            founder_last_name: founder_last_name.into(),
            founder_email: founder_email.into(),
        }
    }
}

/// Result of provisioning: the organization and its founding admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationRegistration {
    /// The freshly created organization.
    pub organization: Organization,
    /// Its founding admin account, active immediately.
    pub admin: UserAccount,
}

/// Service-level errors for organization provisioning.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),

    /// The founder's email is already registered.
    #[error("email already registered: {0}")]
    EmailInUse(String),

    /// No free slug was found within the attempt budget.
    #[error("could not allocate a unique organization slug")]
    SlugAllocation,

    /// Organization repository operation failed.
    #[error(transparent)]
    Organizations(#[from] OrganizationRepositoryError),

    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
}

impl ProvisioningError {
    /// Classifies the error for the caller-facing taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_)
            | Self::EmailInUse(_)
            | Self::Organizations(
                OrganizationRepositoryError::DuplicateName(_)
                | OrganizationRepositoryError::DuplicateSlug(_),
            )
            | Self::Users(
                UserRepositoryError::DuplicateEmail(_) | UserRepositoryError::DuplicateBadge(_),
            ) => ErrorKind::Validation,
            Self::Organizations(OrganizationRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Users(UserRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::SlugAllocation
            | Self::Organizations(OrganizationRepositoryError::Persistence(_))
            | Self::Users(UserRepositoryError::Persistence(_)) => ErrorKind::Internal,
        }
    }
}

/// Result type for provisioning operations.
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

/// Organization provisioning service.
#[derive(Clone)]
pub struct OrganizationProvisioningService<O, U, C>
where
    O: OrganizationRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    organizations: Arc<O>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<O, U, C> OrganizationProvisioningService<O, U, C>
where
    O: OrganizationRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new provisioning service.
    #[must_use]
    pub const fn new(organizations: Arc<O>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            organizations,
            users,
            clock,
        }
    }

    /// Provisions an organization with a generated slug and opens its
    /// founding admin account.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::EmailInUse`] when the founder's email is
    /// taken, a duplicate-name error when the organization name is taken, or
    /// a validation error for malformed fields.
    pub async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> ProvisioningResult<OrganizationRegistration> {
        let name = OrganizationName::new(request.name)?;
        let profile = AccountProfile {
            first_name: PersonName::new(request.founder_first_name)?,
            last_name: PersonName::new(request.founder_last_name)?,
            email: EmailAddress::new(request.founder_email)?,
        };

        if self.users.find_by_email(&profile.email).await?.is_some() {
            return Err(ProvisioningError::EmailInUse(
                profile.email.as_str().to_owned(),
            ));
        }

        let organization = self.store_with_fresh_slug(name).await?;
        let admin = UserAccount::founding_admin(profile, organization.id(), &*self.clock);
        self.users.store(&admin).await?;

        tracing::info!(
            organization = %organization.id(),
            slug = %organization.slug(),
            "organization provisioned"
        );
        Ok(OrganizationRegistration {
            organization,
            admin,
        })
    }

    /// Lists every organization, for the public registration directory.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the listing fails.
    pub async fn list_organizations(&self) -> ProvisioningResult<Vec<Organization>> {
        Ok(self.organizations.list().await?)
    }

    async fn store_with_fresh_slug(
        &self,
        name: OrganizationName,
    ) -> ProvisioningResult<Organization> {
        for _ in 0..MAX_SLUG_ATTEMPTS {
            let organization = Organization::new(name.clone(), generate_slug()?, &*self.clock);
            match self.organizations.store(&organization).await {
                Ok(()) => return Ok(organization),
                Err(OrganizationRepositoryError::DuplicateSlug(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(ProvisioningError::SlugAllocation)
    }
}

/// Generates a random `org-` slug of 8 lowercase alphanumerics.
fn generate_slug() -> Result<OrganizationSlug, DirectoryDomainError> {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_ascii_lowercase();
    OrganizationSlug::new(format!("org-{suffix}"))
}
