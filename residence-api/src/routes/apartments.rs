/// Apartment endpoints (bearer token required)
///
/// - `GET    /api/apartments`: list, sorted by name
/// - `GET    /api/apartments/:id`
/// - `POST   /api/apartments`: `{apartmentName, totalOfFloors?}`, 201 on success
/// - `PUT    /api/apartments/:id`: full replacement
/// - `DELETE /api/apartments/:id`: 409 while residents reference it

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
use residence_shared::{models::apartment::Apartment, registry::validation::ApartmentDraft};
use uuid::Uuid;

const NOT_FOUND: &str = "Apartment not found";

/// Path IDs that are not UUIDs cannot name an apartment
fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn list_apartments(State(state): State<AppState>) -> ApiResult<Json<Vec<Apartment>>> {
    Ok(Json(state.apartments.list().await?))
}

pub async fn get_apartment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Apartment>> {
    let id = parse_id(&id)?;
    Ok(Json(state.apartments.get(id).await?))
}

pub async fn create_apartment(
    State(state): State<AppState>,
    payload: Result<Json<ApartmentDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Apartment>)> {
    let Json(draft) = payload?;
    let apartment = state.apartments.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(apartment)))
}

pub async fn update_apartment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ApartmentDraft>, JsonRejection>,
) -> ApiResult<Json<Apartment>> {
    let id = parse_id(&id)?;
    let Json(draft) = payload?;
    Ok(Json(state.apartments.update(id, &draft).await?))
}

pub async fn delete_apartment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.apartments.delete(id).await?;
    Ok(Json(MessageResponse::new("Apartment deleted successfully")))
}
