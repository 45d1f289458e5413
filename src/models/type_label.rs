//! Tenant-defined client category labels.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A per-tenant category label (e.g. "GST", "IT RETURN") that constrains
/// the `type` field of clients and payment records.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TypeLabel {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub tenant_id: String,
    pub name: String,
    pub created_at: DateTime,
}
