//! Type label handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::DateTime;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{CreateTypeRequest, TypeResponse},
    error::AppError,
    middleware::TenantContext,
    models::TypeLabel,
    startup::AppState,
};

pub async fn list_types(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<Json<Vec<TypeResponse>>, AppError> {
    let labels = state.repository.list_types(&tenant.tenant_id).await?;
    Ok(Json(labels.into_iter().map(TypeResponse::from).collect()))
}

pub async fn create_type(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateTypeRequest>,
) -> Result<(StatusCode, Json<TypeResponse>), AppError> {
    payload.validate()?;
    let name = payload.name.trim().to_string();

    if state
        .repository
        .find_type(&tenant.tenant_id, &name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Type '{}' already exists",
            name
        )));
    }

    let label = TypeLabel {
        id: Uuid::new_v4(),
        tenant_id: tenant.tenant_id.clone(),
        name,
        created_at: DateTime::now(),
    };
    state.repository.insert_type(&label).await?;

    Ok((StatusCode::CREATED, Json(TypeResponse::from(label))))
}

/// Delete a type label. Refused while any client still uses it.
pub async fn delete_type(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    let in_use = state
        .repository
        .count_clients_with_type(&tenant.tenant_id, &name)
        .await?;
    if in_use > 0 {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Type '{}' is used by {} client(s)",
            name,
            in_use
        )));
    }

    let deleted = state.repository.delete_type(&tenant.tenant_id, &name).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Type '{}' not found", name)));
    }

    Ok(StatusCode::NO_CONTENT)
}
