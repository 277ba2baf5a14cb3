// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `QuotaWatch` App
//!
//! Orchestration layer for the `QuotaWatch` application:
//!
//! - [`usage_service`] - Credential lookup, cache consultation, network
//!   fetch, mapping, and cache update
//! - [`notifications`] - Threshold-crossing notifications with hysteresis
//! - [`app_model`] - Top-level setup-vs-ready state machine
//!
//! Components are wired by explicit construction; there is no global
//! container and no global mutable state.

pub mod app_model;
pub mod notifications;
pub mod usage_service;

pub use app_model::AppModel;
pub use notifications::{
    AlertKind, NotificationService, NotificationSink, SystemNotificationSink, UsageAlert,
};
pub use usage_service::{UsageProvider, UsageService};
