#![warn(clippy::all, missing_docs)]

//! Core domain logic for the game catalog browser.
//!
//! This crate hosts the game records, the bundled catalog, the filter
//! engine, the search workflow and the configuration layer used by the
//! terminal UI and any future frontends.

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod search;

pub use catalog::Catalog;
pub use self::config::AppConfig;
pub use error::{CatalogError, ConfigError};
pub use filter::{apply_filters, matching_indices, FilterCriteria, PlatformFilter, RatingTier};
pub use models::GameRecord;
pub use search::{
    OverlapPolicy, ResultSet, SearchEvent, SearchHandle, SearchPhase, SearchScheduler,
    SearchTicket, SearchWorkflow,
};
