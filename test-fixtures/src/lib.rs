//! Shared fixtures for integration tests and benchmarks: a small job
//! collection with a fixed clock, plus builders for the store, the
//! field mapping, and embedded variants of the records.
//!
//! Timestamps are expressed relative to [`fixed_now`] so temporal
//! window tests are deterministic regardless of wall-clock time.

use chrono::{DateTime, Duration, TimeZone, Utc};

use metaseek_core::mapping::{FieldMapping, FieldRole};
use metaseek_core::record::Record;
use metaseek_core::traits::IEmbeddingProvider;
use metaseek_embed::HashedTermProvider;
use metaseek_store::MemoryStore;

/// The frozen "now" every fixture timestamp is relative to.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

fn days_ago(days: i64) -> DateTime<Utc> {
    fixed_now() - Duration::days(days)
}

/// Mapping for the job collection: canonical roles onto its fields.
pub fn job_mapping() -> FieldMapping {
    FieldMapping::new()
        .map(FieldRole::Id, "id")
        .map(FieldRole::Name, "name")
        .map(FieldRole::Status, "status")
        .map(FieldRole::Timestamp, "started")
        .map(FieldRole::Description, "description")
}

/// Ten jobs, no embeddings.
///
/// Status breakdown: 3 failed (job-002 and job-009 within the last
/// seven days, job-005 ten days back), 5 completed, 2 running. Four
/// descriptions mention "database".
pub fn job_records() -> Vec<Record> {
    let job = |id: &str, name: &str, status: &str, days: i64, desc: &str, priority: f64| {
        Record::new(id)
            .field("id", id)
            .field("name", name)
            .field("status", status)
            .field("started", days_ago(days))
            .field("description", desc)
            .field("priority", priority)
            .build()
    };
    vec![
        job("job-001", "nightly-backup", "completed", 1, "nightly database backup to object storage", 2.0),
        job("job-002", "schema-migration", "failed", 2, "database schema migration for the orders table", 5.0),
        job("job-003", "report-build", "completed", 3, "weekly sales report generation", 1.0),
        job("job-004", "index-rebuild", "running", 1, "rebuild the search index from scratch", 3.0),
        job("job-005", "log-rotation", "failed", 10, "rotate and compress application logs", 1.0),
        job("job-006", "cache-warmup", "completed", 4, "warm the query cache after deploy", 2.0),
        job("job-007", "etl-import", "running", 1, "import customer data into the warehouse database", 4.0),
        job("job-008", "cert-renewal", "completed", 20, "renew tls certificates before expiry", 3.0),
        job("job-009", "replica-sync", "failed", 5, "sync the database replica from the primary", 5.0),
        job("job-010", "image-prune", "completed", 30, "prune unused container images", 1.0),
    ]
}

/// The job records with hashed-term embeddings over name + description.
pub fn embedded_job_records() -> Vec<Record> {
    let provider = HashedTermProvider::default();
    job_records()
        .into_iter()
        .map(|record| {
            let text = format!(
                "{} {}",
                record.field("name").map(|v| v.to_text()).unwrap_or_default(),
                record
                    .field("description")
                    .map(|v| v.to_text())
                    .unwrap_or_default(),
            );
            let embedding = provider
                .embed(&text)
                .expect("hashed provider never fails");
            let mut record = record;
            record.embedding = Some(embedding);
            record
        })
        .collect()
}

/// A store over the embedded job records.
pub fn job_store() -> MemoryStore {
    MemoryStore::new(embedded_job_records()).expect("fixture records are well-formed")
}

/// A store over the plain (unembedded) job records.
pub fn plain_job_store() -> MemoryStore {
    MemoryStore::new(job_records()).expect("fixture records are well-formed")
}
