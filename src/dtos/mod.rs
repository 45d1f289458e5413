//! Request and response payloads for the HTTP surface.

use crate::models::{Client, MonthlyMap, PaymentRecord, TrackedYear, TypeLabel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

fn rfc3339(dt: mongodb::bson::DateTime) -> String {
    dt.to_chrono().to_rfc3339()
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64))]
    pub client_type: String,
    pub monthly_expected: Decimal,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64))]
    pub client_type: Option<String>,
    pub monthly_expected: Option<Decimal>,
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub client_type: String,
    pub monthly_expected: Decimal,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            client_type: client.client_type,
            monthly_expected: client.monthly_expected,
            email: client.email,
            phone: client.phone,
            created_at: rfc3339(client.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClientListResponse {
    pub clients: Vec<ClientResponse>,
    pub total: usize,
}

/// Amount and/or remark for one month. `amount: ""` clears that month
/// explicitly; omitting `amount` leaves it untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveMonthEntryRequest {
    #[validate(length(max = 32))]
    pub amount: Option<String>,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentRecordResponse {
    pub id: Uuid,
    pub client_name: String,
    #[serde(rename = "type")]
    pub client_type: String,
    pub year: i32,
    pub payments: MonthlyMap,
    pub remarks: MonthlyMap,
    pub due_payment: Decimal,
    pub last_updated: String,
}

impl From<PaymentRecord> for PaymentRecordResponse {
    fn from(record: PaymentRecord) -> Self {
        Self {
            id: record.id,
            client_name: record.client_name,
            client_type: record.client_type,
            year: record.year,
            payments: record.payments,
            remarks: record.remarks,
            due_payment: record.due_payment,
            last_updated: rfc3339(record.last_updated),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordListResponse {
    pub records: Vec<PaymentRecordResponse>,
    pub year: i32,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ListRecordsParams {
    pub year: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OpenYearRequest {
    #[validate(range(min = 1970, max = 2999))]
    pub year: i32,
}

#[derive(Debug, Serialize)]
pub struct YearResponse {
    pub year: i32,
    pub created_at: String,
}

impl From<TrackedYear> for YearResponse {
    fn from(tracked: TrackedYear) -> Self {
        Self {
            year: tracked.year,
            created_at: rfc3339(tracked.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OpenYearResponse {
    pub year: i32,
    pub records_seeded: usize,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTypeRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TypeResponse {
    pub name: String,
    pub created_at: String,
}

impl From<TypeLabel> for TypeResponse {
    fn from(label: TypeLabel) -> Self {
        Self {
            name: label.name,
            created_at: rfc3339(label.created_at),
        }
    }
}
