//! Tenant-scoped persistence for clients, payment records, type labels and
//! tracked years.
//!
//! Every query filters on `tenant_id`; uniqueness invariants are enforced
//! with unique compound indexes. Payment record mutations go through guarded
//! updates keyed on `last_updated` so concurrent edits to the same
//! (client, type, year) cannot silently lose each other's writes.

use crate::error::AppError;
use crate::models::{Client, MonthlyMap, PaymentRecord, TrackedYear, TypeLabel};
use futures::TryStreamExt;
use mongodb::bson::{doc, to_bson, DateTime};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Clone)]
pub struct LedgerRepository {
    clients: Collection<Client>,
    records: Collection<PaymentRecord>,
    type_labels: Collection<TypeLabel>,
    years: Collection<TrackedYear>,
}

impl LedgerRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            clients: db.collection("clients"),
            records: db.collection("payment_records"),
            type_labels: db.collection("type_labels"),
            years: db.collection("tracked_years"),
        }
    }

    /// Initialize unique indexes backing the per-tenant identity invariants.
    pub async fn init_indexes(&self) -> Result<(), AppError> {
        let client_identity_index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "name": 1, "type": 1 })
            .options(
                IndexOptions::builder()
                    .name("tenant_client_identity_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.clients
            .create_indexes([client_identity_index], None)
            .await?;

        // One record per (client name, type, year) within a tenant
        let record_identity_index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "client_name": 1, "type": 1, "year": 1 })
            .options(
                IndexOptions::builder()
                    .name("tenant_record_identity_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        let record_year_index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "year": 1 })
            .options(
                IndexOptions::builder()
                    .name("tenant_record_year_idx".to_string())
                    .build(),
            )
            .build();

        self.records
            .create_indexes([record_identity_index, record_year_index], None)
            .await?;

        let type_index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("tenant_type_label_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.type_labels.create_indexes([type_index], None).await?;

        let year_index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "year": 1 })
            .options(
                IndexOptions::builder()
                    .name("tenant_year_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.years.create_indexes([year_index], None).await?;

        tracing::info!("Dues service indexes initialized");
        Ok(())
    }

    // ---- clients ----

    pub async fn insert_client(&self, client: &Client) -> Result<(), AppError> {
        self.clients.insert_one(client, None).await?;
        Ok(())
    }

    pub async fn find_client(
        &self,
        tenant_id: &str,
        id: Uuid,
    ) -> Result<Option<Client>, AppError> {
        let filter = doc! { "_id": to_bson(&id)?, "tenant_id": tenant_id };
        Ok(self.clients.find_one(filter, None).await?)
    }

    pub async fn find_client_by_identity(
        &self,
        tenant_id: &str,
        name: &str,
        client_type: &str,
    ) -> Result<Option<Client>, AppError> {
        let filter = doc! { "tenant_id": tenant_id, "name": name, "type": client_type };
        Ok(self.clients.find_one(filter, None).await?)
    }

    pub async fn list_clients(&self, tenant_id: &str) -> Result<Vec<Client>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "name": 1, "type": 1 })
            .build();
        let cursor = self
            .clients
            .find(doc! { "tenant_id": tenant_id }, Some(options))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn replace_client(&self, client: &Client) -> Result<(), AppError> {
        let filter = doc! { "_id": to_bson(&client.id)?, "tenant_id": &client.tenant_id };
        self.clients.replace_one(filter, client, None).await?;
        Ok(())
    }

    pub async fn delete_client(&self, tenant_id: &str, id: Uuid) -> Result<bool, AppError> {
        let filter = doc! { "_id": to_bson(&id)?, "tenant_id": tenant_id };
        let result = self.clients.delete_one(filter, None).await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn count_clients_with_type(
        &self,
        tenant_id: &str,
        client_type: &str,
    ) -> Result<u64, AppError> {
        let filter = doc! { "tenant_id": tenant_id, "type": client_type };
        Ok(self.clients.count_documents(filter, None).await?)
    }

    // ---- payment records ----

    pub async fn insert_record(&self, record: &PaymentRecord) -> Result<(), AppError> {
        self.records.insert_one(record, None).await?;
        Ok(())
    }

    pub async fn find_record(
        &self,
        tenant_id: &str,
        client_name: &str,
        client_type: &str,
        year: i32,
    ) -> Result<Option<PaymentRecord>, AppError> {
        let filter = doc! {
            "tenant_id": tenant_id,
            "client_name": client_name,
            "type": client_type,
            "year": year,
        };
        Ok(self.records.find_one(filter, None).await?)
    }

    pub async fn list_records_for_year(
        &self,
        tenant_id: &str,
        year: i32,
    ) -> Result<Vec<PaymentRecord>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "client_name": 1, "type": 1 })
            .build();
        let cursor = self
            .records
            .find(doc! { "tenant_id": tenant_id, "year": year }, Some(options))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Guarded write of a record's entries and recomputed due.
    ///
    /// Matches on `last_updated` as read; returns false when another writer
    /// got there first, in which case the caller re-reads and retries.
    pub async fn update_record_guarded(
        &self,
        tenant_id: &str,
        id: Uuid,
        read_last_updated: DateTime,
        payments: &MonthlyMap,
        remarks: &MonthlyMap,
        due_payment: Decimal,
    ) -> Result<bool, AppError> {
        let filter = doc! {
            "_id": to_bson(&id)?,
            "tenant_id": tenant_id,
            "last_updated": read_last_updated,
        };
        let update = doc! {
            "$set": {
                "payments": to_bson(payments)?,
                "remarks": to_bson(remarks)?,
                "due_payment": to_bson(&due_payment)?,
                "last_updated": DateTime::now(),
            }
        };
        let result = self.records.update_one(filter, update, None).await?;
        Ok(result.matched_count > 0)
    }

    /// Guarded write of the recomputed due alone, used by carry-forward
    /// ripples that do not touch the monthly entries.
    pub async fn set_record_due_guarded(
        &self,
        tenant_id: &str,
        id: Uuid,
        read_last_updated: DateTime,
        due_payment: Decimal,
    ) -> Result<bool, AppError> {
        let filter = doc! {
            "_id": to_bson(&id)?,
            "tenant_id": tenant_id,
            "last_updated": read_last_updated,
        };
        let update = doc! {
            "$set": {
                "due_payment": to_bson(&due_payment)?,
                "last_updated": DateTime::now(),
            }
        };
        let result = self.records.update_one(filter, update, None).await?;
        Ok(result.matched_count > 0)
    }

    /// Rewrite the identifying fields on all of a client's records after a
    /// rename or type change.
    pub async fn rename_client_records(
        &self,
        tenant_id: &str,
        old_name: &str,
        old_type: &str,
        new_name: &str,
        new_type: &str,
    ) -> Result<u64, AppError> {
        let filter = doc! {
            "tenant_id": tenant_id,
            "client_name": old_name,
            "type": old_type,
        };
        let update = doc! {
            "$set": {
                "client_name": new_name,
                "type": new_type,
                "last_updated": DateTime::now(),
            }
        };
        let result = self.records.update_many(filter, update, None).await?;
        Ok(result.modified_count)
    }

    pub async fn delete_records_for_client(
        &self,
        tenant_id: &str,
        client_name: &str,
        client_type: &str,
    ) -> Result<u64, AppError> {
        let filter = doc! {
            "tenant_id": tenant_id,
            "client_name": client_name,
            "type": client_type,
        };
        let result = self.records.delete_many(filter, None).await?;
        Ok(result.deleted_count)
    }

    // ---- tracked years ----

    pub async fn insert_year(&self, year: &TrackedYear) -> Result<(), AppError> {
        self.years.insert_one(year, None).await?;
        Ok(())
    }

    pub async fn year_exists(&self, tenant_id: &str, year: i32) -> Result<bool, AppError> {
        let filter = doc! { "tenant_id": tenant_id, "year": year };
        Ok(self.years.find_one(filter, None).await?.is_some())
    }

    /// Tracked years in ascending order; carry-forward walks this.
    pub async fn list_years(&self, tenant_id: &str) -> Result<Vec<TrackedYear>, AppError> {
        let options = FindOptions::builder().sort(doc! { "year": 1 }).build();
        let cursor = self
            .years
            .find(doc! { "tenant_id": tenant_id }, Some(options))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    // ---- type labels ----

    pub async fn insert_type(&self, label: &TypeLabel) -> Result<(), AppError> {
        self.type_labels.insert_one(label, None).await?;
        Ok(())
    }

    pub async fn find_type(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> Result<Option<TypeLabel>, AppError> {
        let filter = doc! { "tenant_id": tenant_id, "name": name };
        Ok(self.type_labels.find_one(filter, None).await?)
    }

    pub async fn list_types(&self, tenant_id: &str) -> Result<Vec<TypeLabel>, AppError> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self
            .type_labels
            .find(doc! { "tenant_id": tenant_id }, Some(options))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn delete_type(&self, tenant_id: &str, name: &str) -> Result<bool, AppError> {
        let filter = doc! { "tenant_id": tenant_id, "name": name };
        let result = self.type_labels.delete_one(filter, None).await?;
        Ok(result.deleted_count > 0)
    }
}
