//! Tenant context extractor for multi-tenancy support.
//!
//! Each tenant is one end-user account; all of a tenant's clients, type
//! labels, years and payment records are isolated behind its tenant id.
//! The `X-Tenant-ID` header is set by the authenticating front end after
//! validating the user's session; this service trusts it the way the rest
//! of the platform trusts BFF-set identity headers.

use crate::error::AppError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const TENANT_ID_HEADER: &str = "X-Tenant-ID";

/// Tenant identity extracted from request headers.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: String,
}

impl TenantContext {
    pub fn new(tenant_id: String) -> Self {
        Self { tenant_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = parts
            .headers
            .get(TENANT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!(
                    "Missing X-Tenant-ID header (required from the authenticating front end)"
                ))
            })?;

        // Add to tracing span for observability
        let span = tracing::Span::current();
        span.record("tenant_id", tenant_id);

        Ok(TenantContext::new(tenant_id.to_string()))
    }
}
