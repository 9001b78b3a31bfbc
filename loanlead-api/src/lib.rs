//! # LoanLead API Server Library
//!
//! This library provides the HTTP layer of the LoanLead backend: the public
//! lead form endpoint, admin session handling and the admin lead views.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers and the admin gate
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
