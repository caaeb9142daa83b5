//! Application services for organizations and employee accounts.

mod accounts;
mod provisioning;

pub use accounts::{
    EmployeeAccountError, EmployeeAccountResult, EmployeeAccountService, RegisterEmployeeRequest,
};
pub use provisioning::{
    CreateOrganizationRequest, OrganizationProvisioningService, OrganizationRegistration,
    ProvisioningError, ProvisioningResult,
};
