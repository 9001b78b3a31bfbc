/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login, logout and session status
/// - `leads`: Public lead intake
/// - `admin`: Admin lead listing, filtering, status updates and export

pub mod admin;
pub mod auth;
pub mod health;
pub mod leads;
