//! Ledger orchestration: the read-compute-write cycles around the due
//! calculator.
//!
//! The calculator itself is pure; this service owns everything stateful
//! around it: seeding records when clients or years appear, applying the
//! fill-forward rule before recomputation, fetching the previous year's
//! carry-in, and rippling a changed due forward through later tracked years
//! so every record's `due_payment` stays equal to the calculator's output
//! for its own entries plus carry-in.
//!
//! All record writes are guarded on `last_updated` and retried a bounded
//! number of times; losing the race three times surfaces a 409.

use crate::error::AppError;
use crate::models::{Client, Month, PaymentRecord, TrackedYear, DEFAULT_REMARK};
use crate::services::{dues, metrics};
use mongodb::bson::DateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::repository::LedgerRepository;

const MAX_GUARDED_RETRIES: usize = 3;

#[derive(Clone)]
pub struct LedgerService {
    repo: LedgerRepository,
}

impl LedgerService {
    pub fn new(repo: LedgerRepository) -> Self {
        Self { repo }
    }

    /// Seed one blank record per tracked year for a newly created client.
    ///
    /// All months start empty, so every year's due is 0 before any entry is
    /// made and no carry-in can exist yet.
    pub async fn seed_client_records(&self, client: &Client) -> Result<usize, AppError> {
        let years = self.repo.list_years(&client.tenant_id).await?;
        for tracked in &years {
            let record = PaymentRecord::blank(
                client.tenant_id.clone(),
                client.name.clone(),
                client.client_type.clone(),
                tracked.year,
            );
            self.repo.insert_record(&record).await?;
        }
        metrics::record_seeded(&client.tenant_id, years.len() as u64);
        Ok(years.len())
    }

    /// Open a new tracked year and seed one record per existing client,
    /// carrying each client's prior balance into the fresh year.
    pub async fn open_year(&self, tenant_id: &str, year: i32) -> Result<usize, AppError> {
        if self.repo.year_exists(tenant_id, year).await? {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Year {} is already tracked",
                year
            )));
        }

        let tracked = TrackedYear {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.to_string(),
            year,
            created_at: DateTime::now(),
        };
        self.repo.insert_year(&tracked).await?;

        let clients = self.repo.list_clients(tenant_id).await?;
        for client in &clients {
            let record = PaymentRecord::blank(
                tenant_id.to_string(),
                client.name.clone(),
                client.client_type.clone(),
                year,
            );
            self.repo.insert_record(&record).await?;
            // Pull the carry-in into the fresh record (and ripple onward in
            // case the year was opened between existing ones).
            self.recompute_forward(
                tenant_id,
                &client.name,
                &client.client_type,
                client.monthly_expected,
                year,
            )
            .await?;
        }

        metrics::record_seeded(tenant_id, clients.len() as u64);
        tracing::info!(
            tenant_id = %tenant_id,
            year = year,
            clients = clients.len(),
            "Opened tracked year"
        );
        Ok(clients.len())
    }

    /// Save an amount and/or remark for one month of one client's year.
    ///
    /// A non-empty amount first backfills every blank earlier month with "0"
    /// (billing is contiguous from the first active month); an explicitly
    /// empty amount clears just that month. The record's due is recomputed
    /// in the same guarded write, then later years are recomputed so their
    /// carry-ins follow.
    pub async fn save_month_entry(
        &self,
        tenant_id: &str,
        client_id: Uuid,
        year: i32,
        month: Month,
        amount: Option<String>,
        remark: Option<String>,
    ) -> Result<PaymentRecord, AppError> {
        let client = self
            .repo
            .find_client(tenant_id, client_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

        for attempt in 0..MAX_GUARDED_RETRIES {
            let record = self
                .repo
                .find_record(tenant_id, &client.name, &client.client_type, year)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(anyhow::anyhow!(
                        "No payment record for {} ({}) in {}",
                        client.name,
                        client.client_type,
                        year
                    ))
                })?;

            let mut payments = record.payments.clone();
            let mut remarks = record.remarks.clone();

            if let Some(ref raw) = amount {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    // Explicit clear: only this month leaves the active set.
                    payments.set(month, "");
                } else {
                    let filled = dues::fill_forward(&mut payments, month);
                    if filled > 0 {
                        tracing::debug!(
                            tenant_id = %tenant_id,
                            client = %client.name,
                            year = year,
                            month = %month,
                            backfilled = filled,
                            "Backfilled earlier months as billed-but-unpaid"
                        );
                    }
                    payments.set(month, trimmed);
                }
            }

            if let Some(ref raw) = remark {
                let trimmed = raw.trim();
                remarks.set(month, if trimmed.is_empty() { DEFAULT_REMARK } else { trimmed });
            }

            let carry = self
                .carry_into(tenant_id, &client.name, &client.client_type, year)
                .await?;
            let due = dues::due_payment(client.monthly_expected, &payments, carry);

            let written = self
                .repo
                .update_record_guarded(
                    tenant_id,
                    record.id,
                    record.last_updated,
                    &payments,
                    &remarks,
                    due,
                )
                .await?;

            if written {
                metrics::record_month_entry(tenant_id);
                metrics::record_recomputation(tenant_id, "entry");
                tracing::info!(
                    tenant_id = %tenant_id,
                    client = %client.name,
                    client_type = %client.client_type,
                    year = year,
                    month = %month,
                    due = %due,
                    "Saved month entry"
                );

                // Carry the changed due into every later tracked year.
                self.recompute_forward(
                    tenant_id,
                    &client.name,
                    &client.client_type,
                    client.monthly_expected,
                    year + 1,
                )
                .await?;

                return self
                    .repo
                    .find_record(tenant_id, &client.name, &client.client_type, year)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(anyhow::anyhow!(
                            "Record vanished after guarded update"
                        ))
                    });
            }

            tracing::debug!(
                tenant_id = %tenant_id,
                client = %client.name,
                year = year,
                attempt = attempt + 1,
                "Guarded record update lost the race, retrying"
            );
        }

        Err(AppError::Conflict(anyhow::anyhow!(
            "Record was modified concurrently, please retry"
        )))
    }

    /// Apply edits to a client and keep its records consistent: identity
    /// changes rewrite the records' key fields, and any change that affects
    /// the arithmetic recomputes every tracked year in order.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_client(
        &self,
        tenant_id: &str,
        client_id: Uuid,
        new_name: Option<String>,
        new_type: Option<String>,
        new_expected: Option<Decimal>,
        new_email: Option<String>,
        new_phone: Option<String>,
    ) -> Result<Client, AppError> {
        let mut client = self
            .repo
            .find_client(tenant_id, client_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

        let old_name = client.name.clone();
        let old_type = client.client_type.clone();

        if let Some(name) = new_name {
            client.name = name;
        }
        if let Some(client_type) = new_type {
            client.client_type = client_type;
        }
        let expected_changed = match new_expected {
            Some(expected) => {
                let changed = expected != client.monthly_expected;
                client.monthly_expected = expected;
                changed
            }
            None => false,
        };
        if let Some(email) = new_email {
            client.email = if email.trim().is_empty() { None } else { Some(email) };
        }
        if let Some(phone) = new_phone {
            client.phone = if phone.trim().is_empty() { None } else { Some(phone) };
        }

        let identity_changed = client.name != old_name || client.client_type != old_type;
        if identity_changed {
            if let Some(existing) = self
                .repo
                .find_client_by_identity(tenant_id, &client.name, &client.client_type)
                .await?
            {
                if existing.id != client.id {
                    return Err(AppError::Conflict(anyhow::anyhow!(
                        "A client named '{}' already exists under type '{}'",
                        client.name,
                        client.client_type
                    )));
                }
            }
        }

        self.repo.replace_client(&client).await?;

        if identity_changed {
            let renamed = self
                .repo
                .rename_client_records(
                    tenant_id,
                    &old_name,
                    &old_type,
                    &client.name,
                    &client.client_type,
                )
                .await?;
            tracing::info!(
                tenant_id = %tenant_id,
                old_name = %old_name,
                new_name = %client.name,
                records = renamed,
                "Renamed client records"
            );
        }

        if expected_changed {
            if let Some(first) = self.repo.list_years(tenant_id).await?.first() {
                self.recompute_forward(
                    tenant_id,
                    &client.name,
                    &client.client_type,
                    client.monthly_expected,
                    first.year,
                )
                .await?;
            }
            metrics::record_recomputation(tenant_id, "client_update");
        }

        Ok(client)
    }

    /// Delete a client and every payment record it owns.
    pub async fn delete_client(&self, tenant_id: &str, client_id: Uuid) -> Result<u64, AppError> {
        let client = self
            .repo
            .find_client(tenant_id, client_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

        let deleted = self
            .repo
            .delete_records_for_client(tenant_id, &client.name, &client.client_type)
            .await?;
        self.repo.delete_client(tenant_id, client_id).await?;

        tracing::info!(
            tenant_id = %tenant_id,
            client = %client.name,
            client_type = %client.client_type,
            records_deleted = deleted,
            "Deleted client"
        );
        Ok(deleted)
    }

    /// The carry-in for `year`: the final due of the nearest tracked year
    /// before it, if any. The first tracked year has no carry-in.
    async fn carry_into(
        &self,
        tenant_id: &str,
        client_name: &str,
        client_type: &str,
        year: i32,
    ) -> Result<Option<Decimal>, AppError> {
        let years = self.repo.list_years(tenant_id).await?;
        let previous = years
            .iter()
            .map(|t| t.year)
            .filter(|y| *y < year)
            .max();

        let Some(previous) = previous else {
            return Ok(None);
        };

        let due = self
            .repo
            .find_record(tenant_id, client_name, client_type, previous)
            .await?
            .map(|r| r.due_payment)
            .unwrap_or(Decimal::ZERO);
        Ok(Some(due))
    }

    /// Recompute `due_payment` for every tracked year >= `from_year`, in
    /// ascending order, threading each year's due into the next year's
    /// carry-in. Years without a record for this client are skipped and
    /// leave the carry unchanged.
    async fn recompute_forward(
        &self,
        tenant_id: &str,
        client_name: &str,
        client_type: &str,
        expected_monthly: Decimal,
        from_year: i32,
    ) -> Result<(), AppError> {
        let years = self.repo.list_years(tenant_id).await?;

        let mut carry = if let Some(first) = years.iter().map(|t| t.year).filter(|y| *y >= from_year).min() {
            self.carry_into(tenant_id, client_name, client_type, first)
                .await?
        } else {
            return Ok(());
        };

        for tracked in years.iter().filter(|t| t.year >= from_year) {
            if let Some(due) = self
                .recompute_record_due(
                    tenant_id,
                    client_name,
                    client_type,
                    expected_monthly,
                    tracked.year,
                    carry,
                )
                .await?
            {
                carry = Some(due);
            }
        }

        Ok(())
    }

    /// Recompute one record's due with the given carry-in, writing only when
    /// the figure actually changed. Returns the record's final due, or None
    /// when the client has no record for that year.
    async fn recompute_record_due(
        &self,
        tenant_id: &str,
        client_name: &str,
        client_type: &str,
        expected_monthly: Decimal,
        year: i32,
        carry: Option<Decimal>,
    ) -> Result<Option<Decimal>, AppError> {
        for _ in 0..MAX_GUARDED_RETRIES {
            let Some(record) = self
                .repo
                .find_record(tenant_id, client_name, client_type, year)
                .await?
            else {
                return Ok(None);
            };

            let due = dues::due_payment(expected_monthly, &record.payments, carry);
            if due == record.due_payment {
                return Ok(Some(due));
            }

            let written = self
                .repo
                .set_record_due_guarded(tenant_id, record.id, record.last_updated, due)
                .await?;
            if written {
                metrics::record_recomputation(tenant_id, "carry_forward");
                tracing::debug!(
                    tenant_id = %tenant_id,
                    client = %client_name,
                    year = year,
                    due = %due,
                    "Recomputed carried-forward due"
                );
                return Ok(Some(due));
            }
        }

        Err(AppError::Conflict(anyhow::anyhow!(
            "Record for {} was modified concurrently during recompute",
            year
        )))
    }
}
