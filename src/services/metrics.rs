//! Metrics module for dues-service.
//! Prometheus counters for ledger operations and per-tenant metering.

use once_cell::sync::Lazy;
use prometheus::{opts, register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

/// Due recomputations by tenant and trigger (entry, client_update,
/// carry_forward).
pub static DUE_RECOMPUTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "dues_recomputations_total",
            "Total due-payment recomputations by tenant and trigger"
        ),
        &["tenant_id", "trigger"]
    )
    .expect("Failed to register DUE_RECOMPUTATIONS_TOTAL")
});

/// Month entries saved (per-tenant metering).
pub static MONTH_ENTRIES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "dues_month_entries_total",
            "Total month entries saved by tenant"
        ),
        &["tenant_id"]
    )
    .expect("Failed to register MONTH_ENTRIES_TOTAL")
});

/// Payment records seeded when clients or years are created.
pub static RECORDS_SEEDED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "dues_records_seeded_total",
            "Total payment records seeded by tenant"
        ),
        &["tenant_id"]
    )
    .expect("Failed to register RECORDS_SEEDED_TOTAL")
});

/// Initialize all metrics. Call once at startup.
pub fn init_metrics() {
    Lazy::force(&DUE_RECOMPUTATIONS_TOTAL);
    Lazy::force(&MONTH_ENTRIES_TOTAL);
    Lazy::force(&RECORDS_SEEDED_TOTAL);
}

/// Render the default registry in Prometheus text exposition format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).ok();
    String::from_utf8(buffer).unwrap_or_else(|_| "# encoding error\n".to_string())
}

pub fn record_recomputation(tenant_id: &str, trigger: &str) {
    DUE_RECOMPUTATIONS_TOTAL
        .with_label_values(&[tenant_id, trigger])
        .inc();
}

pub fn record_month_entry(tenant_id: &str) {
    MONTH_ENTRIES_TOTAL.with_label_values(&[tenant_id]).inc();
}

pub fn record_seeded(tenant_id: &str, count: u64) {
    if count > 0 {
        RECORDS_SEEDED_TOTAL
            .with_label_values(&[tenant_id])
            .inc_by(count);
    }
}
