/// Data models for UserDesk
///
/// # Models
///
/// - `user`: The User record and its create/patch inputs

pub mod user;
