/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: User CRUD, search and patch endpoints

pub mod health;
pub mod users;
