//! Unit tests for directory domain values and the account lifecycle.

use crate::directory::domain::{
    AccountProfile, DirectoryDomainError, EmailAddress, EmployeeBadge, OrganizationName,
    OrganizationSlug, PersonName, UserAccount,
};
use crate::identity::{AccountStatus, OrganizationId, Role};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn profile(email: &str) -> eyre::Result<AccountProfile> {
    Ok(AccountProfile {
        first_name: PersonName::new("Robin")?,
        last_name: PersonName::new("Worker")?,
        email: EmailAddress::new(email)?,
    })
}

#[rstest]
#[case("A", 1)]
#[case("  x ", 1)]
fn person_name_shorter_than_two_characters_is_rejected(
    #[case] input: &str,
    #[case] length: usize,
) {
    assert_eq!(
        PersonName::new(input),
        Err(DirectoryDomainError::InvalidNameLength(length))
    );
}

#[rstest]
fn person_name_longer_than_thirty_characters_is_rejected() {
    let input = "n".repeat(31);
    assert_eq!(
        PersonName::new(input),
        Err(DirectoryDomainError::InvalidNameLength(31))
    );
}

#[rstest]
#[case("robin@example.com")]
#[case("  Robin@Example.COM  ")]
#[case("a.b+c@sub.domain.org")]
fn well_formed_emails_are_accepted_and_lowercased(#[case] input: &str) -> eyre::Result<()> {
    let email = EmailAddress::new(input)?;
    ensure!(email.as_str() == email.as_str().to_ascii_lowercase());
    ensure!(email.as_str().contains('@'));
    Ok(())
}

#[rstest]
#[case("not-an-email")]
#[case("@example.com")]
#[case("robin@nodot")]
#[case("robin@.com")]
#[case("robin@example.")]
fn malformed_emails_are_rejected(#[case] input: &str) {
    assert!(EmailAddress::new(input).is_err());
}

#[rstest]
#[case("123456", true)]
#[case("000000", true)]
#[case("12345", false)]
#[case("1234567", false)]
#[case("12a456", false)]
fn badge_must_be_exactly_six_digits(#[case] input: &str, #[case] accepted: bool) {
    assert_eq!(EmployeeBadge::new(input).is_ok(), accepted);
}

#[rstest]
fn organization_name_bounds_are_enforced() {
    assert!(OrganizationName::new("A").is_err());
    assert!(OrganizationName::new("n".repeat(101)).is_err());
    assert!(OrganizationName::new("Acme Logistics").is_ok());
}

#[rstest]
#[case("org-a1b2c3d4", true)]
#[case("plain-slug", true)]
#[case("", false)]
#[case("Org-UPPER", false)]
#[case("has space", false)]
fn slug_allows_only_lowercase_alphanumerics_and_hyphens(
    #[case] input: &str,
    #[case] accepted: bool,
) {
    assert_eq!(OrganizationSlug::new(input).is_ok(), accepted);
}

#[rstest]
fn registered_employee_starts_pending_without_badge(clock: DefaultClock) -> eyre::Result<()> {
    let account =
        UserAccount::register_employee(profile("robin@example.com")?, OrganizationId::new(), &clock);

    ensure!(account.role() == Role::Employee);
    ensure!(account.status() == AccountStatus::Pending);
    ensure!(account.badge().is_none());
    Ok(())
}

#[rstest]
fn founding_admin_is_active_immediately(clock: DefaultClock) -> eyre::Result<()> {
    let account =
        UserAccount::founding_admin(profile("avery@example.com")?, OrganizationId::new(), &clock);

    ensure!(account.role() == Role::Admin);
    ensure!(account.status() == AccountStatus::Active);
    Ok(())
}

#[rstest]
fn approval_assigns_the_badge_and_activates(clock: DefaultClock) -> eyre::Result<()> {
    let mut account =
        UserAccount::register_employee(profile("robin@example.com")?, OrganizationId::new(), &clock);
    let badge = EmployeeBadge::new("654321")?;

    account.approve(badge.clone(), &clock)?;

    ensure!(account.status() == AccountStatus::Active);
    ensure!(account.badge() == Some(&badge));
    Ok(())
}

#[rstest]
fn rejection_requires_a_pending_account(clock: DefaultClock) -> eyre::Result<()> {
    let mut account =
        UserAccount::register_employee(profile("robin@example.com")?, OrganizationId::new(), &clock);
    account.reject(&clock)?;
    ensure!(account.status() == AccountStatus::Rejected);

    let again = account.reject(&clock);
    ensure!(
        again
            == Err(DirectoryDomainError::StatusChangeRequiresPending {
                user: account.id(),
                status: AccountStatus::Rejected,
            })
    );
    Ok(())
}

#[rstest]
fn approval_requires_a_pending_account(clock: DefaultClock) -> eyre::Result<()> {
    let mut account =
        UserAccount::register_employee(profile("robin@example.com")?, OrganizationId::new(), &clock);
    account.approve(EmployeeBadge::new("111222")?, &clock)?;

    let again = account.approve(EmployeeBadge::new("333444")?, &clock);
    ensure!(
        again
            == Err(DirectoryDomainError::StatusChangeRequiresPending {
                user: account.id(),
                status: AccountStatus::Active,
            })
    );
    Ok(())
}
