//! Client model.

use mongodb::bson::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A billed client belonging to one tenant.
///
/// The pair (name, type) identifies the client within a tenant; the same
/// name may appear once per type (e.g. "Acme" under "GST" and "IT RETURN").
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Client {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub tenant_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub client_type: String,
    /// Contracted monthly amount. Strictly positive; bounded by the
    /// configured ceiling at the handler layer.
    pub monthly_expected: Decimal,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime,
}
