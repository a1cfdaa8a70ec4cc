#![forbid(unsafe_code)]

//! Core domain model and business logic for the Nutri tracking system.
//!
//! This crate provides:
//! - Domain types (profiles, food entries, meal logs, reports)
//! - Target calculator (BMR/TDEE and goal-adjusted targets)
//! - Meal ledger (single, batch, and catalog-based logging)
//! - Daily aggregator and report archiver
//! - Persistence (JSON store with atomic commits, CSV export)

pub mod types;
pub mod error;
pub mod targets;
pub mod profile;
pub mod catalog;
pub mod store;
pub mod config;
pub mod logging;
pub mod ledger;
pub mod aggregate;
pub mod archive;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use targets::compute_targets;
pub use store::NutritionStore;
pub use config::Config;
pub use profile::{register_profile, update_biometrics, BiometricUpdate, RegisterProfile};
pub use catalog::{add_catalog_food, list_catalog, seed_catalog, NewCatalogFood};
pub use ledger::{add_entry, add_entry_batch, delete_entry, list_by_slot_and_date, log_catalog_food};
pub use aggregate::aggregate_day;
pub use archive::{archive_day, export_reports_csv, list_reports};
