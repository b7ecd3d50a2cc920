/// Resident endpoints (bearer token required)
///
/// - `GET    /api/residents`: list with apartments populated, newest first
/// - `GET    /api/residents/:id`
/// - `POST   /api/residents`: 201 on success
/// - `PUT    /api/residents/:id`: full replacement
/// - `DELETE /api/residents/:id`
///
/// Request bodies use the resident field names: `residentName`,
/// `residentDescription`, `floor`, `yOB`, `isOwned`, `apartment`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use residence_shared::{
    models::resident::{Resident, ResidentDetails},
    registry::validation::ResidentDraft,
};
use uuid::Uuid;

const NOT_FOUND: &str = "Resident not found";

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn list_residents(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ResidentDetails>>> {
    Ok(Json(state.residents.list().await?))
}

pub async fn get_resident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ResidentDetails>> {
    let id = parse_id(&id)?;
    Ok(Json(state.residents.get(id).await?))
}

pub async fn create_resident(
    State(state): State<AppState>,
    payload: Result<Json<ResidentDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Resident>)> {
    let Json(draft) = payload?;
    let resident = state.residents.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(resident)))
}

pub async fn update_resident(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ResidentDraft>, JsonRejection>,
) -> ApiResult<Json<Resident>> {
    let id = parse_id(&id)?;
    let Json(draft) = payload?;
    Ok(Json(state.residents.update(id, &draft).await?))
}

pub async fn delete_resident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.residents.delete(id).await?;
    Ok(Json(MessageResponse::new("Resident deleted successfully")))
}
