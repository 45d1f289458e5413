//! Tracked year handlers.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    dtos::{OpenYearRequest, OpenYearResponse, YearResponse},
    error::AppError,
    middleware::TenantContext,
    startup::AppState,
};

pub async fn list_years(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<Json<Vec<YearResponse>>, AppError> {
    let years = state.repository.list_years(&tenant.tenant_id).await?;
    Ok(Json(years.into_iter().map(YearResponse::from).collect()))
}

/// Open a new tracked year, seeding one blank record per client with the
/// prior year's balance carried in.
pub async fn open_year(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<OpenYearRequest>,
) -> Result<(StatusCode, Json<OpenYearResponse>), AppError> {
    payload.validate()?;

    let seeded = state
        .ledger
        .open_year(&tenant.tenant_id, payload.year)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OpenYearResponse {
            year: payload.year,
            records_seeded: seeded,
        }),
    ))
}
