/// Startup seeding
///
/// Makes sure the admin panel is reachable on a fresh database by creating a
/// default admin account. Called once from `main` after migrations; safe to
/// call again.

use tracing::{debug, info};

use super::{Storage, StorageError, StorageResult};
use crate::models::user::CreateUser;

/// Username of the account created on an empty database
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password of the account created on an empty database
pub const DEFAULT_ADMIN_PASSWORD: &str = "adminpass";

/// Creates the default admin unless a user with that name already exists
///
/// # Returns
///
/// `true` if the account was created by this call
///
/// # Errors
///
/// Returns an error if the store is unreachable. A concurrent insert of the
/// same username is treated as "already exists".
pub async fn ensure_default_admin(
    storage: &dyn Storage,
    username: &str,
    password: &str,
) -> StorageResult<bool> {
    if storage.get_user_by_username(username).await?.is_some() {
        debug!(username, "Default admin already present");
        return Ok(false);
    }

    let created = storage
        .create_user(CreateUser {
            username: username.to_string(),
            password: password.to_string(),
            is_admin: true,
        })
        .await;

    match created {
        Ok(user) => {
            info!(user_id = user.id, username, "Created default admin user");
            Ok(true)
        }
        Err(StorageError::Conflict(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let store = MemoryStorage::new();

        assert!(ensure_default_admin(&store, DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap());
        assert!(!ensure_default_admin(&store, DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap());

        let admin = store
            .get_user_by_username(DEFAULT_ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_admin);
        assert_eq!(admin.password, "adminpass");
    }
}
