//! # LoanLead Shared Library
//!
//! This crate contains the data layer and business logic behind the LoanLead
//! API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and queries
//! - `db`: Connection pool and migrations
//! - `storage`: Storage trait with PostgreSQL and in-memory backends
//! - `auth`: Session store and credential checks
//! - `leads`: Submission validation, admin filters and CSV export

pub mod auth;
pub mod db;
pub mod leads;
pub mod models;
pub mod storage;

/// Current version of the LoanLead shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
