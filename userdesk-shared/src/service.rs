/// User service
///
/// The business layer between the HTTP handlers and the repository. Nearly
/// every method forwards to one repository call; the exceptions are
/// [`UserService::find_by_name_and_active`], which treats an empty name as
/// "any name".
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use userdesk_shared::models::user::{NewUser, UserPatch};
/// use userdesk_shared::repository::InMemoryUserRepository;
/// use userdesk_shared::service::UserService;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let service = UserService::new(Arc::new(InMemoryUserRepository::new()));
///
/// let user = service.create_user(NewUser::default()).await?;
/// let user = service.patch_user(user.id, UserPatch::active(true)).await?;
/// assert_eq!(user.and_then(|u| u.is_active), Some(true));
/// # Ok(())
/// # }
/// ```

use crate::models::user::{NewUser, User, UserPatch};
use crate::repository::{RepositoryResult, UserRepository};
use std::sync::Arc;
use tracing::{debug, instrument};

/// User business service
///
/// Cheap to clone; clones share the same repository.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    /// Creates a service over the given repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Persists a new user and returns it with its assigned ID
    #[instrument(name = "users.service.create_user", skip(self, data))]
    pub async fn create_user(&self, data: NewUser) -> RepositoryResult<User> {
        let user = self.repo.insert(data).await?;
        debug!(user_id = user.id, "Created user");
        Ok(user)
    }

    /// Lists every user
    #[instrument(name = "users.service.get_all_users", skip(self))]
    pub async fn get_all_users(&self) -> RepositoryResult<Vec<User>> {
        self.repo.find_all().await
    }

    /// Looks up a user by ID; a miss is `Ok(None)`
    #[instrument(name = "users.service.get_user_by_id", skip(self))]
    pub async fn get_user_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    /// Looks up a user by exact email
    #[instrument(name = "users.service.get_user_by_email", skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    /// Users whose name equals `name`
    #[instrument(name = "users.service.get_users_by_name", skip(self))]
    pub async fn get_users_by_name(&self, name: &str) -> RepositoryResult<Vec<User>> {
        self.repo.find_by_user_name(name).await
    }

    /// Users whose email contains `fragment`
    #[instrument(name = "users.service.search_user_by_email", skip(self))]
    pub async fn search_user_by_email(&self, fragment: &str) -> RepositoryResult<Vec<User>> {
        self.repo.search_by_email(fragment).await
    }

    /// Users flagged active
    #[instrument(name = "users.service.get_active_users", skip(self))]
    pub async fn get_active_users(&self) -> RepositoryResult<Vec<User>> {
        self.repo.find_all_active_users().await
    }

    /// Users flagged inactive
    #[instrument(name = "users.service.get_inactive_users", skip(self))]
    pub async fn get_inactive_users(&self) -> RepositoryResult<Vec<User>> {
        self.repo.find_by_is_active(false).await
    }

    /// Users whose name contains `name` and whose active flag equals `is_active`
    ///
    /// A missing or empty `name` matches every name, so the query falls back
    /// to the plain active-flag filter.
    #[instrument(name = "users.service.find_by_name_and_active", skip(self))]
    pub async fn find_by_name_and_active(
        &self,
        name: Option<&str>,
        is_active: bool,
    ) -> RepositoryResult<Vec<User>> {
        match name {
            Some(name) if !name.is_empty() => {
                self.repo.find_by_name_and_active(name, is_active).await
            }
            _ => {
                debug!("Empty name filter, filtering on active flag only");
                self.repo.find_by_is_active(is_active).await
            }
        }
    }

    /// Number of active users
    #[instrument(name = "users.service.count_active_users", skip(self))]
    pub async fn count_active_users(&self) -> RepositoryResult<i64> {
        self.repo.count_active_users().await
    }

    /// Replaces every mutable field of user `id`
    ///
    /// Returns `None` if the user does not exist.
    #[instrument(name = "users.service.update_user", skip(self, data))]
    pub async fn update_user(&self, id: i64, data: NewUser) -> RepositoryResult<Option<User>> {
        self.repo.update(data.with_id(id)).await
    }

    /// Applies a partial update to user `id`
    ///
    /// Returns `None` if the user does not exist. Fields absent from the patch
    /// keep their stored values, even under concurrent patches of other fields.
    #[instrument(name = "users.service.patch_user", skip(self, patch))]
    pub async fn patch_user(&self, id: i64, patch: UserPatch) -> RepositoryResult<Option<User>> {
        let patched = self.repo.patch(id, patch).await?;
        if patched.is_none() {
            debug!("User not found, nothing to patch");
        }
        Ok(patched)
    }

    /// Deletes user `id`; deleting a missing user is a no-op
    #[instrument(name = "users.service.delete_user", skip(self))]
    pub async fn delete_user(&self, id: i64) -> RepositoryResult<()> {
        let deleted = self.repo.delete_by_id(id).await?;
        debug!(deleted, "Delete finished");
        Ok(())
    }

    /// Whether the backing store answers
    #[instrument(name = "users.service.health", skip(self))]
    pub async fn health(&self) -> bool {
        match self.repo.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Store health check failed");
                false
            }
        }
    }
}
