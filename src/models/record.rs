//! Payment record model: one client's monthly entries for one year.

use crate::models::MonthlyMap;
use mongodb::bson::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default remark for a month with nothing noted against it.
pub const DEFAULT_REMARK: &str = "N/A";

/// One year of monthly entries for a (client name, type) pair.
///
/// `due_payment` is always the calculator's output for `payments` plus the
/// previous tracked year's carry-in; it is never written directly from a
/// request payload. `last_updated` doubles as the optimistic-concurrency
/// token for guarded updates.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub tenant_id: String,
    pub client_name: String,
    #[serde(rename = "type")]
    pub client_type: String,
    pub year: i32,
    /// Amount entered per month; empty string means not yet billed.
    pub payments: MonthlyMap,
    /// Free-text remark per month, "N/A" when unset.
    pub remarks: MonthlyMap,
    pub due_payment: Decimal,
    pub created_at: DateTime,
    pub last_updated: DateTime,
}

impl PaymentRecord {
    /// A fresh record with all months blank and no due before carry-in.
    pub fn blank(
        tenant_id: String,
        client_name: String,
        client_type: String,
        year: i32,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            client_name,
            client_type,
            year,
            payments: MonthlyMap::default(),
            remarks: MonthlyMap::filled(DEFAULT_REMARK),
            due_payment: Decimal::ZERO,
            created_at: now,
            last_updated: now,
        }
    }
}
