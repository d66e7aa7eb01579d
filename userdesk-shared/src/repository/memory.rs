/// In-memory user repository
///
/// Keeps rows in a `BTreeMap` behind a tokio `RwLock`, so iteration order is
/// ID order, matching the `ORDER BY id` of the PostgreSQL implementation.
/// IDs start at 1 and are never reused, like a `BIGSERIAL` sequence.
///
/// Useful for:
/// - Testing the service and HTTP layers without a database
/// - Running the server locally with `USER_STORE=memory`
///
/// # Example
///
/// ```
/// use userdesk_shared::models::user::NewUser;
/// use userdesk_shared::repository::{InMemoryUserRepository, UserRepository};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = InMemoryUserRepository::new();
/// let user = repo.insert(NewUser::default()).await?;
/// assert_eq!(user.id, 1);
/// # Ok(())
/// # }
/// ```

use super::{RepositoryResult, UserRepository};
use crate::models::user::{NewUser, User, UserPatch};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, User>,
    last_id: i64,
}

/// User repository held entirely in process memory
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    async fn select<F>(&self, predicate: F) -> Vec<User>
    where
        F: Fn(&User) -> bool,
    {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .filter(|user| predicate(user))
            .cloned()
            .collect()
    }
}

fn contains(field: &Option<String>, fragment: &str) -> bool {
    field.as_deref().is_some_and(|value| value.contains(fragment))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.select(|_| true).await)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|user| user.email.as_deref() == Some(email))
            .cloned())
    }

    async fn search_by_email(&self, fragment: &str) -> RepositoryResult<Vec<User>> {
        Ok(self.select(|user| contains(&user.email, fragment)).await)
    }

    async fn find_by_is_active(&self, is_active: bool) -> RepositoryResult<Vec<User>> {
        Ok(self.select(|user| user.is_active == Some(is_active)).await)
    }

    async fn find_all_active_users(&self) -> RepositoryResult<Vec<User>> {
        self.find_by_is_active(true).await
    }

    async fn find_by_user_name(&self, name: &str) -> RepositoryResult<Vec<User>> {
        Ok(self.select(|user| user.name.as_deref() == Some(name)).await)
    }

    async fn find_by_name_and_active(
        &self,
        name: &str,
        is_active: bool,
    ) -> RepositoryResult<Vec<User>> {
        Ok(self
            .select(|user| contains(&user.name, name) && user.is_active == Some(is_active))
            .await)
    }

    async fn count_active_users(&self) -> RepositoryResult<i64> {
        let table = self.table.read().await;
        let count = table
            .rows
            .values()
            .filter(|user| user.is_active == Some(true))
            .count();
        Ok(count as i64)
    }

    async fn insert(&self, data: NewUser) -> RepositoryResult<User> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let user = data.with_id(table.last_id);
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> RepositoryResult<Option<User>> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&user.id) {
            Some(row) => {
                *row = user.clone();
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn patch(&self, id: i64, patch: UserPatch) -> RepositoryResult<Option<User>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            patch.apply(row);
            row.clone()
        }))
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
