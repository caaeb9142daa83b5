//! In-memory user account repository.

use crate::directory::domain::{EmailAddress, EmployeeBadge, UserAccount};
use crate::directory::ports::{UserRepository, UserRepositoryError, UserRepositoryResult};
use crate::identity::{OrganizationId, Role, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory user repository.
///
/// Uniqueness scans are linear; account counts stay small enough in tests
/// that secondary indexes are not worth keeping consistent here.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    accounts: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn read_accounts<T>(
    accounts: &Arc<RwLock<HashMap<UserId, UserAccount>>>,
    f: impl FnOnce(&HashMap<UserId, UserAccount>) -> T,
) -> UserRepositoryResult<T> {
    let guard = accounts
        .read()
        .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
    Ok(f(&guard))
}

fn write_accounts<T>(
    accounts: &Arc<RwLock<HashMap<UserId, UserAccount>>>,
    f: impl FnOnce(&mut HashMap<UserId, UserAccount>) -> UserRepositoryResult<T>,
) -> UserRepositoryResult<T> {
    let mut guard = accounts
        .write()
        .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
    f(&mut guard)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, account: &UserAccount) -> UserRepositoryResult<()> {
        write_accounts(&self.accounts, |accounts| {
            if accounts
                .values()
                .any(|existing| existing.email() == account.email())
            {
                return Err(UserRepositoryError::DuplicateEmail(
                    account.email().as_str().to_owned(),
                ));
            }
            accounts.insert(account.id(), account.clone());
            Ok(())
        })
    }

    async fn update(&self, account: &UserAccount) -> UserRepositoryResult<()> {
        write_accounts(&self.accounts, |accounts| {
            if !accounts.contains_key(&account.id()) {
                return Err(UserRepositoryError::NotFound(account.id()));
            }
            if let Some(badge) = account.badge() {
                let taken = accounts
                    .values()
                    .any(|other| other.id() != account.id() && other.badge() == Some(badge));
                if taken {
                    return Err(UserRepositoryError::DuplicateBadge(
                        badge.as_str().to_owned(),
                    ));
                }
            }
            accounts.insert(account.id(), account.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<UserAccount>> {
        read_accounts(&self.accounts, |accounts| accounts.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserRepositoryResult<Option<UserAccount>> {
        read_accounts(&self.accounts, |accounts| {
            accounts
                .values()
                .find(|account| account.email() == email)
                .cloned()
        })
    }

    async fn badge_exists(&self, badge: &EmployeeBadge) -> UserRepositoryResult<bool> {
        read_accounts(&self.accounts, |accounts| {
            accounts
                .values()
                .any(|account| account.badge() == Some(badge))
        })
    }

    async fn list_by_organization(
        &self,
        organization: OrganizationId,
        role: Option<Role>,
    ) -> UserRepositoryResult<Vec<UserAccount>> {
        read_accounts(&self.accounts, |accounts| {
            let mut matched: Vec<UserAccount> = accounts
                .values()
                .filter(|account| account.organization() == organization)
                .filter(|account| role.is_none_or(|role| account.role() == role))
                .cloned()
                .collect();
            matched.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
            matched
        })
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        write_accounts(&self.accounts, |accounts| {
            accounts
                .remove(&id)
                .map(|_| ())
                .ok_or(UserRepositoryError::NotFound(id))
        })
    }
}
