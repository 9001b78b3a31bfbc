/// Admin authentication
///
/// # Modules
///
/// - [`session`]: in-process `tower-sessions` store, signing key and pruner
/// - [`service`]: credential check, login/logout and the admin predicate
///
/// # Known weakness
///
/// Passwords are stored and compared as plain text.

pub mod service;
pub mod session;

pub use service::{AuthError, AuthService, SessionUser};
pub use session::{signing_key, MemorySessionStore, USER_ID_KEY};
