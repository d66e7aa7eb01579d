/// User repository
///
/// The data-access seam between the service layer and the store. The
/// [`UserRepository`] trait is object-safe so the service can hold an
/// `Arc<dyn UserRepository>` and stay ignorant of the backing store.
///
/// # Implementations
///
/// - [`PgUserRepository`]: PostgreSQL via sqlx
/// - [`InMemoryUserRepository`]: process-local store for tests and local runs
///
/// # Filter semantics
///
/// Substring filters (`search_by_email`, `find_by_name_and_active`) are
/// case-sensitive and treat `%`, `_` and `\` in the fragment literally.
/// Flag filters compare exactly, so a row whose flag was never set matches
/// neither `true` nor `false`.

use crate::models::user::{NewUser, User, UserPatch};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// Repository error types
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store cannot serve requests right now
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Repository result type alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence operations for [`User`] rows
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All rows, ordered by ID
    async fn find_all(&self) -> RepositoryResult<Vec<User>>;

    /// Point lookup by primary key. Absence is `Ok(None)`.
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;

    /// Exact email match (lowest ID wins if duplicates exist)
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// Rows whose email contains `fragment`
    async fn search_by_email(&self, fragment: &str) -> RepositoryResult<Vec<User>>;

    /// Rows whose active flag equals `is_active`
    async fn find_by_is_active(&self, is_active: bool) -> RepositoryResult<Vec<User>>;

    /// Rows whose active flag is true
    async fn find_all_active_users(&self) -> RepositoryResult<Vec<User>>;

    /// Exact name match
    async fn find_by_user_name(&self, name: &str) -> RepositoryResult<Vec<User>>;

    /// Rows whose name contains `name` and whose active flag equals `is_active`
    async fn find_by_name_and_active(
        &self,
        name: &str,
        is_active: bool,
    ) -> RepositoryResult<Vec<User>>;

    /// Number of rows whose active flag is true
    async fn count_active_users(&self) -> RepositoryResult<i64>;

    /// Inserts a new row; the store assigns the ID
    async fn insert(&self, data: NewUser) -> RepositoryResult<User>;

    /// Overwrites every mutable column of the row with `user.id`
    ///
    /// Returns `None` if no such row exists.
    async fn update(&self, user: User) -> RepositoryResult<Option<User>>;

    /// Writes only the `Some` fields of `patch` to the row with `id`, atomically
    ///
    /// Returns `None` if no such row exists.
    async fn patch(&self, id: i64, patch: UserPatch) -> RepositoryResult<Option<User>>;

    /// Deletes by ID. Returns true if a row was removed; a missing ID is not an error.
    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool>;

    /// Verifies the store is reachable
    async fn ping(&self) -> RepositoryResult<()>;
}

/// Builds a `LIKE` pattern matching `fragment` anywhere, with wildcards escaped
pub(crate) fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_plain() {
        assert_eq!(contains_pattern("ann"), "%ann%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("a_b"), r"%a\_b%");
        assert_eq!(contains_pattern("100%"), r"%100\%%");
        assert_eq!(contains_pattern(r"x\y"), r"%x\\y%");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Unavailable("pool closed".to_string());
        assert_eq!(err.to_string(), "Store unavailable: pool closed");
    }
}
