//! Service tests for organization provisioning.

use super::support::{Directory, directory};
use crate::directory::services::{CreateOrganizationRequest, ProvisioningError};
use crate::error::ErrorKind;
use crate::identity::{AccountStatus, Role};
use eyre::ensure;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provisioning_creates_the_organization_and_its_admin() -> eyre::Result<()> {
    let Directory { provisioning, .. } = directory();

    let registration = provisioning
        .create_organization(CreateOrganizationRequest::new(
            "Acme Logistics",
            "Avery",
            "Founder",
            "Avery@Example.com",
        ))
        .await?;

    ensure!(registration.organization.name().as_str() == "Acme Logistics");
    let slug = registration.organization.slug().as_str();
    ensure!(slug.starts_with("org-"));
    ensure!(slug.len() == 12);

    let admin = &registration.admin;
    ensure!(admin.role() == Role::Admin);
    ensure!(admin.status() == AccountStatus::Active);
    ensure!(admin.email().as_str() == "avery@example.com");
    ensure!(admin.organization() == registration.organization.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn organization_names_are_unique() -> eyre::Result<()> {
    let harness = directory();
    harness.provision("Acme Logistics", "first@example.com").await?;

    let result = harness
        .provisioning
        .create_organization(CreateOrganizationRequest::new(
            "Acme Logistics",
            "Blake",
            "Founder",
            "second@example.com",
        ))
        .await;

    ensure!(matches!(
        result,
        Err(ProvisioningError::Organizations(_))
    ));
    if let Err(err) = result {
        ensure!(err.kind() == ErrorKind::Validation);
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn founder_emails_are_unique_across_organizations() -> eyre::Result<()> {
    let harness = directory();
    harness.provision("Acme Logistics", "avery@example.com").await?;

    let result = harness
        .provisioning
        .create_organization(CreateOrganizationRequest::new(
            "Globex Freight",
            "Avery",
            "Founder",
            "avery@example.com",
        ))
        .await;

    ensure!(matches!(
        result,
        Err(ProvisioningError::EmailInUse(email)) if email == "avery@example.com"
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provisioning_validates_the_organization_name() {
    let Directory { provisioning, .. } = directory();

    let result = provisioning
        .create_organization(CreateOrganizationRequest::new(
            "A",
            "Avery",
            "Founder",
            "avery@example.com",
        ))
        .await;

    assert!(matches!(result, Err(ProvisioningError::Domain(_))));
    if let Err(err) = result {
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn the_public_directory_lists_every_organization() -> eyre::Result<()> {
    let harness = directory();
    harness.provision("Acme Logistics", "avery@example.com").await?;
    harness.provision("Globex Freight", "blake@example.com").await?;

    let listed = harness.provisioning.list_organizations().await?;

    ensure!(listed.len() == 2);
    ensure!(listed[0].name().as_str() == "Acme Logistics");
    ensure!(listed[1].name().as_str() == "Globex Freight");
    Ok(())
}
