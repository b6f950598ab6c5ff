//! Admin roster management route handlers.
//!
//! All roster mutations require the super-admin; checking one's own role and
//! changing one's own password only require a session.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use careline_core::Username;

use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, RequireSuperAdmin};
use crate::models::admin::AdminSummary;
use crate::state::AppState;

/// Request body for creating an admin.
#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub password: String,
}

/// Request body for the self-service password change.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Generic success body: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for the role check endpoint.
#[derive(Debug, Serialize)]
pub struct CheckSuperResponse {
    pub is_super_admin: bool,
    pub username: Username,
}

/// Build the admin roster router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admins", get(list_admins).post(create_admin))
        .route("/api/admins/check-super", get(check_super))
        .route("/api/admins/update-password", put(update_password))
        .route("/api/admins/{username}", delete(delete_admin))
}

/// List all admin accounts, reserved super-admin first.
///
/// GET /api/admins
async fn list_admins(
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminSummary>>, AppError> {
    let admins = state.accounts().list_admins().await?;
    Ok(Json(admins))
}

/// Create a new admin account.
///
/// POST /api/admins
#[instrument(skip(admin, state, body), fields(created_by = %admin.username))]
async fn create_admin(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateAdminRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let created = state
        .accounts()
        .create_admin(&body.username, &body.password, &admin.username)
        .await?;

    Ok(Json(MessageResponse {
        message: format!("Admin '{}' added successfully", created.username),
    }))
}

/// Delete an admin account.
///
/// DELETE /api/admins/{username}
#[instrument(skip(admin, state), fields(deleted_by = %admin.username))]
async fn delete_admin(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let username =
        Username::parse(&username).map_err(|e| AppError::Validation(e.to_string()))?;

    state.accounts().delete_admin(&username).await?;

    Ok(Json(MessageResponse {
        message: format!("Admin '{username}' deleted successfully"),
    }))
}

/// Change the calling admin's own password.
///
/// PUT /api/admins/update-password
#[instrument(skip(admin, state, body), fields(username = %admin.username))]
async fn update_password(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .accounts()
        .update_password(&admin.username, &body.current_password, &body.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

/// Report the calling admin's identity and role.
///
/// GET /api/admins/check-super
async fn check_super(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CheckSuperResponse> {
    Json(CheckSuperResponse {
        is_super_admin: admin.is_super_admin,
        username: admin.username,
    })
}
