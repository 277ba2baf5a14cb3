// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `QuotaWatch` API
//!
//! Wire format, response mapping, and HTTP transport for the `QuotaWatch`
//! application.
//!
//! This crate owns everything between raw bytes and the domain model:
//!
//! - [`wire`] - Serde types matching the usage-metering API payloads
//! - [`mapper`] - Pure conversion from wire types into
//!   [`quotawatch_core::UsageSnapshot`], enforcing required-field invariants
//! - [`executor`] - The [`RequestExecutor`] trait the acquisition layer
//!   depends on
//! - [`client`] - The reqwest-backed [`ApiClient`] implementation
//!
//! Transport policy (timeouts, TLS) lives in [`client`]; retry policy, if
//! any, belongs to callers.

pub mod client;
pub mod executor;
pub mod mapper;
pub mod wire;

pub use client::ApiClient;
pub use executor::{HttpMethod, RequestExecutor};
pub use mapper::{map_usage, parse_organizations};
pub use wire::{UsageApiResponse, UsageLimitResponse};

/// Account key under which the single session key is stored.
pub const KEYCHAIN_ACCOUNT: &str = "default";

/// Endpoint listing the organizations reachable with a session key.
pub const ORGANIZATIONS_ENDPOINT: &str = "/organizations";

/// Builds the usage endpoint path for an organization.
pub fn usage_endpoint(organization_uuid: &uuid::Uuid) -> String {
    format!("/organizations/{organization_uuid}/usage")
}
