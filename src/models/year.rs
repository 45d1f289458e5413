//! Tracked years.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A year a tenant tracks payments for. Opening a year seeds one payment
/// record per existing client.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TrackedYear {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub tenant_id: String,
    pub year: i32,
    pub created_at: DateTime,
}
