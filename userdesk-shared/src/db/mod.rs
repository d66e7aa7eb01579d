/// Database layer for UserDesk
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Embedded schema migrations
///
/// Queries against the `users` table live in
/// [`repository::postgres`](crate::repository::postgres).

pub mod migrations;
pub mod pool;
