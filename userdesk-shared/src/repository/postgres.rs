/// PostgreSQL user repository
///
/// Every operation is a single parameterized statement against the `users`
/// table.
///
/// # Example
///
/// ```no_run
/// use userdesk_shared::db::pool::{create_pool, DatabaseConfig};
/// use userdesk_shared::models::user::NewUser;
/// use userdesk_shared::repository::{PgUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let repo = PgUserRepository::new(pool);
/// let user = repo
///     .insert(NewUser {
///         name: Some("Ann".to_string()),
///         email: Some("ann@x.com".to_string()),
///         ..Default::default()
///     })
///     .await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use super::{contains_pattern, RepositoryResult, UserRepository};
use crate::models::user::{NewUser, User, UserPatch};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// User repository backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a repository over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for health checks and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, is_active
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, is_active
            FROM users
            WHERE email = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn search_by_email(&self, fragment: &str) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, is_active
            FROM users
            WHERE email LIKE $1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(contains_pattern(fragment))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_is_active(&self, is_active: bool) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, is_active
            FROM users
            WHERE is_active = $1
            ORDER BY id
            "#,
        )
        .bind(is_active)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_all_active_users(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, is_active
            FROM users
            WHERE is_active = TRUE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_user_name(&self, name: &str) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, is_active
            FROM users
            WHERE name = $1
            ORDER BY id
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_name_and_active(
        &self,
        name: &str,
        is_active: bool,
    ) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, is_active
            FROM users
            WHERE name LIKE $1 ESCAPE '\' AND is_active = $2
            ORDER BY id
            "#,
        )
        .bind(contains_pattern(name))
        .bind(is_active)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn count_active_users(&self) -> RepositoryResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn insert(&self, data: NewUser) -> RepositoryResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, phone, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, is_active
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.is_active)
        .fetch_one(&self.pool)
        .await?;

        debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn update(&self, user: User) -> RepositoryResult<Option<User>> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, phone = $4, is_active = $5
            WHERE id = $1
            RETURNING id, name, email, phone, is_active
            "#,
        )
        .bind(user.id)
        .bind(user.name)
        .bind(user.email)
        .bind(user.phone)
        .bind(user.is_active)
        .fetch_optional(&self.pool)
        .await?;

        debug!(user_id = user.id, found = updated.is_some(), "Updated user");
        Ok(updated)
    }

    async fn patch(&self, id: i64, patch: UserPatch) -> RepositoryResult<Option<User>> {
        let patched = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                is_active = COALESCE($5, is_active)
            WHERE id = $1
            RETURNING id, name, email, phone, is_active
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.phone)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await?;

        debug!(user_id = id, found = patched.is_some(), "Patched user");
        Ok(patched)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(user_id = id, rows = result.rows_affected(), "Deleted user");
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }
}
