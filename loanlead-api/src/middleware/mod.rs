/// Middleware modules for the API server
///
/// This module contains custom middleware for:
/// - Security headers
/// - Admin session checks

pub mod security;
pub mod session;
