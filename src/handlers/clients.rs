//! Client handlers.
//!
//! All operations are scoped to the tenant from the request context. The
//! contracted monthly amount is validated here (strictly positive, below
//! the configured ceiling); the calculator never checks bounds itself.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::DateTime;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{ClientListResponse, ClientResponse, CreateClientRequest, UpdateClientRequest},
    error::AppError,
    middleware::TenantContext,
    models::Client,
    startup::AppState,
};

fn validate_expected(amount: Decimal, ceiling: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "monthly_expected must be strictly positive"
        )));
    }
    if amount > ceiling {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "monthly_expected exceeds the configured ceiling of {}",
            ceiling
        )));
    }
    Ok(())
}

/// Register a client and seed a payment record for every tracked year.
pub async fn create_client(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), AppError> {
    payload.validate()?;
    validate_expected(
        payload.monthly_expected,
        state.config.limits.max_monthly_expected,
    )?;

    let name = payload.name.trim().to_string();
    let client_type = payload.client_type.trim().to_string();

    if state
        .repository
        .find_type(&tenant.tenant_id, &client_type)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Unknown type '{}': create the type label first",
            client_type
        )));
    }

    if state
        .repository
        .find_client_by_identity(&tenant.tenant_id, &name, &client_type)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "A client named '{}' already exists under type '{}'",
            name,
            client_type
        )));
    }

    let client = Client {
        id: Uuid::new_v4(),
        tenant_id: tenant.tenant_id.clone(),
        name,
        client_type,
        monthly_expected: payload.monthly_expected,
        email: payload.email,
        phone: payload.phone,
        created_at: DateTime::now(),
    };

    state.repository.insert_client(&client).await?;
    let seeded = state.ledger.seed_client_records(&client).await?;

    tracing::info!(
        tenant_id = %tenant.tenant_id,
        client = %client.name,
        client_type = %client.client_type,
        records_seeded = seeded,
        "Created client"
    );

    Ok((StatusCode::CREATED, Json(ClientResponse::from(client))))
}

pub async fn list_clients(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<Json<ClientListResponse>, AppError> {
    let clients = state.repository.list_clients(&tenant.tenant_id).await?;
    let total = clients.len();
    Ok(Json(ClientListResponse {
        clients: clients.into_iter().map(ClientResponse::from).collect(),
        total,
    }))
}

pub async fn get_client(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ClientResponse>, AppError> {
    let client = state
        .repository
        .find_client(&tenant.tenant_id, client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;
    Ok(Json(ClientResponse::from(client)))
}

/// Edit a client. Renames propagate to all of its records; a changed
/// expected amount recomputes every tracked year.
pub async fn update_client(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, AppError> {
    payload.validate()?;

    if let Some(expected) = payload.monthly_expected {
        validate_expected(expected, state.config.limits.max_monthly_expected)?;
    }
    if let Some(ref client_type) = payload.client_type {
        let trimmed = client_type.trim();
        if state
            .repository
            .find_type(&tenant.tenant_id, trimmed)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unknown type '{}': create the type label first",
                trimmed
            )));
        }
    }

    let client = state
        .ledger
        .update_client(
            &tenant.tenant_id,
            client_id,
            payload.name.map(|n| n.trim().to_string()),
            payload.client_type.map(|t| t.trim().to_string()),
            payload.monthly_expected,
            payload.email,
            payload.phone,
        )
        .await?;

    Ok(Json(ClientResponse::from(client)))
}

/// Delete a client and all of its payment records.
pub async fn delete_client(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(client_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .ledger
        .delete_client(&tenant.tenant_id, client_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
