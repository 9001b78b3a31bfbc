/// Authentication session layer
///
/// [`AuthService`] ties the credential check to a `tower-sessions`
/// [`Session`]. HTTP handlers hand it the request's session and get back a
/// typed answer; the session layer takes care of the cookie.
///
/// # States
///
/// ```text
/// Unauthenticated --login (valid credentials)--> Authenticated
/// Authenticated   --logout / 24h expiry-------> Unauthenticated
/// ```
///
/// # Example
///
/// ```
/// use loanlead_shared::auth::{AuthService, MemorySessionStore};
/// use loanlead_shared::storage::{bootstrap, MemoryStorage};
/// use std::sync::Arc;
/// use tower_sessions::Session;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = Arc::new(MemoryStorage::new());
/// bootstrap::ensure_default_admin(storage.as_ref(), "admin", "adminpass").await?;
///
/// let auth = AuthService::new(storage, chrono::Duration::hours(24));
/// let session = Session::new(None, Arc::new(MemorySessionStore::new()), None);
///
/// auth.login(&session, "admin", "adminpass").await?;
/// let admin = auth.require_admin(&session).await?;
/// assert_eq!(admin.username, "admin");
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tower_sessions::{session, Expiry, Session};

use super::session::USER_ID_KEY;
use crate::models::user::User;
use crate::storage::{Storage, StorageError};

/// Authentication failures
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No session, or the session's user is not an admin
    #[error("Access denied")]
    AccessDenied,

    /// The user store failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The session store failed
    #[error("Session error: {0}")]
    Session(#[from] session::Error),
}

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }
    }
}

/// Credential check plus session bookkeeping
#[derive(Clone)]
pub struct AuthService {
    storage: Arc<dyn Storage>,
    max_age: time::Duration,
}

impl AuthService {
    /// Creates a service whose sessions expire `max_age` after login
    pub fn new(storage: Arc<dyn Storage>, max_age: chrono::Duration) -> Self {
        Self {
            storage,
            max_age: time::Duration::seconds(max_age.num_seconds()),
        }
    }

    /// Looks up `username` and compares the stored password byte-for-byte
    ///
    /// Both failure cases return the same error.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .storage
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !passwords_match(&user.password, password) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Verifies credentials and binds the user to `session`
    ///
    /// The session gets a new ID, so an ID the client held before login is
    /// never promoted to an authenticated one. A failed login leaves the
    /// session untouched.
    pub async fn login(
        &self,
        session: &Session,
        username: &str,
        password: &str,
    ) -> Result<SessionUser, AuthError> {
        let user = self.verify_credentials(username, password).await?;

        session.cycle_id().await?;
        session.insert(USER_ID_KEY, user.id).await?;
        session.set_expiry(Some(Expiry::AtDateTime(
            OffsetDateTime::now_utc() + self.max_age,
        )));

        tracing::info!(user_id = user.id, username = %user.username, "User logged in");
        Ok(user.into())
    }

    /// Resolves the session to the signed-in user
    ///
    /// Returns None for a session without a user, and for a session whose
    /// user no longer exists.
    pub async fn current_user(&self, session: &Session) -> Result<Option<SessionUser>, AuthError> {
        let Some(user_id) = session.get::<i32>(USER_ID_KEY).await? else {
            return Ok(None);
        };

        let user = self.storage.get_user(user_id).await?;
        Ok(user.map(SessionUser::from))
    }

    /// Ends the session, if any
    pub async fn logout(&self, session: &Session) -> Result<(), AuthError> {
        session.flush().await?;
        Ok(())
    }

    /// Resolves the session and requires the admin flag
    ///
    /// No session and a non-admin session produce the same
    /// [`AuthError::AccessDenied`].
    pub async fn require_admin(&self, session: &Session) -> Result<SessionUser, AuthError> {
        match self.current_user(session).await? {
            Some(user) if user.is_admin => Ok(user),
            _ => Err(AuthError::AccessDenied),
        }
    }
}

/// Byte-for-byte equality that inspects every byte
fn passwords_match(stored: &str, given: &str) -> bool {
    let (a, b) = (stored.as_bytes(), given.as_bytes());
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
