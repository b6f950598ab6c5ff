//! Complaint intake and triage route handlers.
//!
//! The `/web` endpoints back the public patient form: submission hands out a
//! tracking id, tracking looks a complaint up by that id. The `/api`
//! endpoints are the triage dashboard and require a logged-in admin.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use careline_core::{ComplaintId, ComplaintStatus};

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::complaint::{Complaint, ComplaintRecord};
use crate::routes::admins::MessageResponse;
use crate::state::AppState;

/// Complaint submission form data.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub patient_name: String,
    pub complaint_type: String,
    pub description: String,
}

/// Response for a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub complaint_id: ComplaintId,
}

/// Tracking form data.
#[derive(Debug, Deserialize)]
pub struct TrackForm {
    pub complaint_id: String,
}

/// Request body for a triage update.
#[derive(Debug, Deserialize)]
pub struct UpdateComplaintRequest {
    pub status: ComplaintStatus,
    #[serde(default)]
    pub admin_comment: String,
}

/// Build the complaints router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/web/submit", post(submit))
        .route("/web/track", post(track))
        .route("/api/complaints", get(list_complaints))
        .route(
            "/api/complaints/{id}",
            put(update_complaint).delete(delete_complaint),
        )
}

/// Draw a fresh tracking id.
fn generate_complaint_id() -> ComplaintId {
    let number = rand::rng().random_range(ComplaintId::MIN_NUMBER..=ComplaintId::MAX_NUMBER);
    ComplaintId::from_number(number).expect("generated number is always in range")
}

/// Handle the patient complaint form.
///
/// POST /web/submit
#[instrument(skip(state, form), fields(complaint_type = %form.complaint_type))]
async fn submit(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Result<Json<SubmitResponse>, AppError> {
    let patient_name = form.patient_name.trim();
    let complaint_type = form.complaint_type.trim();
    let description = form.description.trim();

    if patient_name.is_empty() || complaint_type.is_empty() || description.is_empty() {
        return Err(AppError::Validation(
            "Name, complaint type, and description are required".to_string(),
        ));
    }

    let id = generate_complaint_id();
    let record = ComplaintRecord {
        patient_name: patient_name.to_string(),
        complaint_type: complaint_type.to_string(),
        description: description.to_string(),
        date_submitted: Utc::now().date_naive(),
        status: ComplaintStatus::Pending,
        admin_comment: String::new(),
    };

    state.complaints().set(&id, &record).await?;

    tracing::info!(complaint_id = %id, "Complaint recorded");

    Ok(Json(SubmitResponse {
        message: format!(
            "Thank you! Your complaint has been recorded. Your Complaint ID is {id}"
        ),
        complaint_id: id,
    }))
}

/// Look up a complaint by tracking id.
///
/// POST /web/track
#[instrument(skip(state, form), fields(complaint_id = %form.complaint_id))]
async fn track(
    State(state): State<AppState>,
    Form(form): Form<TrackForm>,
) -> Result<Json<Complaint>, AppError> {
    let raw = form.complaint_id.trim();
    // A malformed id cannot exist; same answer as an unknown one
    let not_found = || AppError::NotFound(format!("Complaint ID {raw} not found"));

    let id = ComplaintId::parse(raw).map_err(|_| not_found())?;
    let complaint = state.complaints().get(&id).await?.ok_or_else(not_found)?;

    Ok(Json(complaint))
}

/// List all complaints for the triage dashboard.
///
/// GET /api/complaints
async fn list_complaints(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Complaint>>, AppError> {
    let complaints = state.complaints().list().await?;
    Ok(Json(complaints))
}

/// Update a complaint's triage status and admin comment.
///
/// PUT /api/complaints/{id}
#[instrument(skip(admin, state, body), fields(updated_by = %admin.username))]
async fn update_complaint(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateComplaintRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = ComplaintId::parse(&id)
        .map_err(|_| AppError::NotFound(format!("Complaint ID {id} not found")))?;

    let mut complaint = state
        .complaints()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Complaint ID {id} not found")))?;

    complaint.record.status = body.status;
    complaint.record.admin_comment = body.admin_comment;
    state.complaints().set(&id, &complaint.record).await?;

    tracing::info!(complaint_id = %id, status = %complaint.record.status, "Complaint updated");

    Ok(Json(MessageResponse {
        message: format!("Complaint {id} updated successfully"),
    }))
}

/// Delete a complaint.
///
/// DELETE /api/complaints/{id}
#[instrument(skip(admin, state), fields(deleted_by = %admin.username))]
async fn delete_complaint(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = ComplaintId::parse(&id)
        .map_err(|_| AppError::NotFound(format!("Complaint ID {id} not found")))?;

    if state.complaints().get(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("Complaint ID {id} not found")));
    }
    state.complaints().delete(&id).await?;

    tracing::info!(complaint_id = %id, "Complaint deleted");

    Ok(Json(MessageResponse {
        message: format!("Complaint {id} deleted successfully"),
    }))
}
