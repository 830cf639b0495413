//! Folio - personal project and finance tracker
//!
//! This library provides the core functionality for Folio: projects with
//! nested progress entries, attachments and bookmarked links, alongside a
//! ledger of income and expense entries. Everything is kept in a local
//! key-value store; summaries and reports are derived on demand.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (projects, entries, finance entries)
//! - `storage`: Versioned key-value persistence
//! - `services`: Business logic and import application
//! - `reports`: Finance summaries and project reports
//! - `export`: JSON, CSV and combined backup exports
//! - `backup`: Automatic backup management
//! - `links`: Link preview resolution
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `folio` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use folio::config::{paths::FolioPaths, settings::Settings};
//! use folio::storage::Storage;
//!
//! let paths = FolioPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths)?;
//! storage.load_all()?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod links;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FolioError, FolioResult};
