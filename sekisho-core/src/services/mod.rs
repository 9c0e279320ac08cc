//! Service layer for business logic
//!
//! Services are generic over the repository traits in [`crate::repositories`]
//! and hold them behind `Arc` so they can be shared across tasks.

pub mod provisioning;
pub mod seeding;
pub mod tenant;

#[cfg(test)]
pub(crate) mod mock;

pub use provisioning::{ProvisionOutcome, SkipReason, TenantClientProvisioner};
pub use seeding::{ClientApplicationSeeder, DataSeedContext, SeedReport, SeedingService};
pub use tenant::{DomainTenantResolver, TenantService};
