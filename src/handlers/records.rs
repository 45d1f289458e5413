//! Payment record handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{ListRecordsParams, PaymentRecordResponse, RecordListResponse, SaveMonthEntryRequest},
    error::AppError,
    middleware::TenantContext,
    models::Month,
    startup::AppState,
};

/// List a tenant's payment records for one year.
pub async fn list_records(
    State(state): State<AppState>,
    tenant: TenantContext,
    Query(params): Query<ListRecordsParams>,
) -> Result<Json<RecordListResponse>, AppError> {
    let records = state
        .repository
        .list_records_for_year(&tenant.tenant_id, params.year)
        .await?;
    let total = records.len();
    Ok(Json(RecordListResponse {
        records: records
            .into_iter()
            .map(PaymentRecordResponse::from)
            .collect(),
        year: params.year,
        total,
    }))
}

/// Save an amount and/or remark for one month of a client's year.
///
/// Earlier blank months are backfilled with "0" before the due is
/// recomputed; the changed balance then carries into later tracked years.
pub async fn save_month_entry(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path((year, client_id, month)): Path<(i32, Uuid, String)>,
    Json(payload): Json<SaveMonthEntryRequest>,
) -> Result<Json<PaymentRecordResponse>, AppError> {
    payload.validate()?;

    let month: Month = month
        .parse()
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("{}", e)))?;

    if payload.amount.is_none() && payload.remark.is_none() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Nothing to save: provide an amount and/or a remark"
        )));
    }

    let record = state
        .ledger
        .save_month_entry(
            &tenant.tenant_id,
            client_id,
            year,
            month,
            payload.amount,
            payload.remark,
        )
        .await?;

    Ok(Json(PaymentRecordResponse::from(record)))
}
