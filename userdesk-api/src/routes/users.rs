/// User endpoints
///
/// HTTP adapter over [`UserService`](userdesk_shared::service::UserService).
/// Every handler parses its path or query parameters, makes one service
/// call, and returns JSON.
///
/// # Endpoints
///
/// All paths are relative to `/api/users`.
///
/// ```text
/// GET    /                       list all users
/// POST   /                       create a user
/// GET    /:id                    get a user                  (404 if missing)
/// PUT    /:id                    replace a user              (404 if missing)
/// DELETE /:id                    delete a user               (200 even if missing)
/// GET    /name/:name             exact name match
/// GET    /email/:email           email substring match
/// GET    /status/:status         "active" (any case) or anything else = inactive
/// GET    /filter/active-list     active users
/// GET    /filter/inactive-list   inactive users
/// GET    /count/active-users     number of active users
/// GET    /search?email=          email substring match
/// GET    /lookup?email=          exact email lookup          (400 if empty, 404 if missing)
/// PATCH  /:id/activate           set isActive = true         (404 if missing)
/// PATCH  /:id/deactivate         set isActive = false        (404 if missing)
/// PATCH  /:id/name/:name         set name                    (404 if missing)
/// PATCH  /:id/email/:email       set email                   (404 if missing)
/// PATCH  /:id/phone/:phone       set phone                   (404 if missing)
/// ```
///
/// Text parameters and body fields containing NUL are rejected with 400.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use userdesk_shared::models::user::{NewUser, User, UserPatch};

/// Query string for the email search and lookup routes
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    /// Email fragment (search) or full address (lookup)
    pub email: String,
}

/// `GET /api/users`
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.get_all_users().await?))
}

/// `GET /api/users/:id`
///
/// # Errors
///
/// - `404 Not Found`: No user with this ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    state
        .users
        .get_user_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::user_not_found(id))
}

/// `POST /api/users`
///
/// # Request
///
/// ```json
/// { "name": "Ann", "email": "ann@x.com", "phone": "555", "isActive": false }
/// ```
///
/// # Response
///
/// The stored row, including its assigned `id`.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> ApiResult<Json<User>> {
    reject_nul_fields(&req.name, &req.email, &req.phone)?;
    let user = state.users.create_user(req).await?;
    tracing::info!(user_id = user.id, "User created");
    Ok(Json(user))
}

/// `PUT /api/users/:id`
///
/// Replaces every field of the user with the request body. Fields missing
/// from the body are cleared.
///
/// # Errors
///
/// - `404 Not Found`: No user with this ID
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NewUser>,
) -> ApiResult<Json<User>> {
    reject_nul_fields(&req.name, &req.email, &req.phone)?;
    state
        .users
        .update_user(id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::user_not_found(id))
}

/// `DELETE /api/users/:id`
///
/// Always 200 with an empty body, whether or not the user existed.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.users.delete_user(id).await?;
    Ok(StatusCode::OK)
}

/// `GET /api/users/name/:name`
pub async fn users_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<User>>> {
    reject_nul("name", &name)?;
    Ok(Json(state.users.get_users_by_name(&name).await?))
}

/// `GET /api/users/email/:email`
pub async fn users_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Vec<User>>> {
    reject_nul("email", &email)?;
    Ok(Json(state.users.search_user_by_email(&email).await?))
}

/// `GET /api/users/status/:status`
pub async fn users_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<Json<Vec<User>>> {
    let is_active = status_is_active(&status);
    Ok(Json(
        state.users.find_by_name_and_active(None, is_active).await?,
    ))
}

/// `GET /api/users/filter/active-list`
pub async fn active_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.get_active_users().await?))
}

/// `GET /api/users/filter/inactive-list`
pub async fn inactive_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.get_inactive_users().await?))
}

/// `GET /api/users/count/active-users`
///
/// Responds with a bare JSON integer.
pub async fn count_active_users(State(state): State<AppState>) -> ApiResult<Json<i64>> {
    Ok(Json(state.users.count_active_users().await?))
}

/// `GET /api/users/search?email=`
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<Vec<User>>> {
    reject_nul("email", &query.email)?;
    Ok(Json(state.users.search_user_by_email(&query.email).await?))
}

/// `GET /api/users/lookup?email=`
///
/// # Errors
///
/// - `400 Bad Request`: Empty email, or email containing NUL
/// - `404 Not Found`: No user with exactly this email
pub async fn lookup_user(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<User>> {
    if query.email.is_empty() {
        return Err(ApiError::BadRequest("email must not be empty".to_string()));
    }
    reject_nul("email", &query.email)?;

    state
        .users
        .get_user_by_email(&query.email)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No user with email {}", query.email)))
}

/// `PATCH /api/users/:id/activate`
pub async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    patch_user(&state, id, UserPatch::active(true)).await
}

/// `PATCH /api/users/:id/deactivate`
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    patch_user(&state, id, UserPatch::active(false)).await
}

/// `PATCH /api/users/:id/name/:name`
pub async fn update_user_name(
    State(state): State<AppState>,
    Path((id, name)): Path<(i64, String)>,
) -> ApiResult<Json<User>> {
    patch_user(&state, id, UserPatch::name(name)).await
}

/// `PATCH /api/users/:id/email/:email`
pub async fn update_user_email(
    State(state): State<AppState>,
    Path((id, email)): Path<(i64, String)>,
) -> ApiResult<Json<User>> {
    patch_user(&state, id, UserPatch::email(email)).await
}

/// `PATCH /api/users/:id/phone/:phone`
pub async fn update_user_phone(
    State(state): State<AppState>,
    Path((id, phone)): Path<(i64, String)>,
) -> ApiResult<Json<User>> {
    patch_user(&state, id, UserPatch::phone(phone)).await
}

async fn patch_user(state: &AppState, id: i64, patch: UserPatch) -> ApiResult<Json<User>> {
    reject_nul_fields(&patch.name, &patch.email, &patch.phone)?;
    state
        .users
        .patch_user(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::user_not_found(id))
}

/// PostgreSQL text cannot hold NUL, so no store accepts it
fn reject_nul(field: &str, value: &str) -> ApiResult<()> {
    if value.contains('\0') {
        return Err(ApiError::BadRequest(format!(
            "{} must not contain NUL characters",
            field
        )));
    }
    Ok(())
}

fn reject_nul_fields(
    name: &Option<String>,
    email: &Option<String>,
    phone: &Option<String>,
) -> ApiResult<()> {
    for (field, value) in [("name", name), ("email", email), ("phone", phone)] {
        if let Some(value) = value {
            reject_nul(field, value)?;
        }
    }
    Ok(())
}

/// `"active"` in any case means active; every other value means inactive
fn status_is_active(status: &str) -> bool {
    status.eq_ignore_ascii_case("active")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_active() {
        assert!(status_is_active("active"));
        assert!(status_is_active("ACTIVE"));
        assert!(status_is_active("Active"));
        assert!(!status_is_active("inactive"));
        assert!(!status_is_active("enabled"));
        assert!(!status_is_active(""));
    }

    #[test]
    fn test_reject_nul() {
        assert!(reject_nul("email", "ann@x.com").is_ok());
        assert!(reject_nul("email", "").is_ok());
        assert!(matches!(
            reject_nul("email", "ann\0@x.com"),
            Err(ApiError::BadRequest(_))
        ));

        let clean = Some("Ann".to_string());
        let dirty = Some("55\05".to_string());
        assert!(reject_nul_fields(&clean, &None, &clean).is_ok());
        assert!(reject_nul_fields(&clean, &None, &dirty).is_err());
    }
}
