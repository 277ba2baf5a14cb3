// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `QuotaWatch` Core
//!
//! Core types, models, and errors for the `QuotaWatch` application.
//!
//! This crate provides the foundational abstractions used across all other
//! `QuotaWatch` crates, including:
//!
//! - Domain models (usage windows, snapshots, status classification)
//! - Credential and organization types
//! - User settings and notification hysteresis state
//! - Error types
//!
//! ## Key Types
//!
//! ### Usage Types
//! - [`UsageSnapshot`] - Aggregate of the session, weekly, and sonnet windows
//! - [`UsageWindow`] - A single rolling quota window
//! - [`UsageStatus`] - Safe/warning/critical classification
//!
//! ### Account Types
//! - [`SessionKey`] - Validated Claude session key
//! - [`Organization`] - Organization reachable with a session key
//!
//! ### Settings & Notifications
//! - [`AppSettings`] - User preferences
//! - [`NotificationThresholds`] - Warning/critical percentages
//! - [`NotificationState`] - Fire-once-until-rearm hysteresis flags
//!
//! ### Errors
//! - [`AppError`] - Application-level error taxonomy
//! - [`MappingError`], [`NetworkError`], [`SessionKeyError`]

pub mod error;
pub mod models;

// Re-export error types
pub use error::{AppError, MappingError, NetworkError, SessionKeyError};

// Re-export all model types
pub use models::{
    AppSettings,
    NotificationState,
    NotificationThresholds,
    Organization,
    SessionKey,
    UsageSnapshot,
    UsageStatus,
    UsageWindow,
    MAX_REFRESH_INTERVAL_SECS,
    MIN_REFRESH_INTERVAL_SECS,
};
