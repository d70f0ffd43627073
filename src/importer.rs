//! Dedup import loop.
//!
//! Records are processed one at a time in file order. In [`DedupStrategy::Lookup`]
//! mode each record costs a lookup and, when absent, an insert; the two steps
//! are not atomic, so two importers running at once can both insert the same
//! place. [`DedupStrategy::Upsert`] closes that window with a unique index and
//! an insert-only upsert.

use anyhow::Result;
use clap::ValueEnum;
use indicatif::ProgressBar;
use serde::Deserialize;
use tracing::debug;

use crate::models::PlaceRecord;
use crate::store::PlaceStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupStrategy {
    /// Look up the natural key, insert when absent
    #[default]
    Lookup,
    /// Unique index plus atomic insert-only upsert
    Upsert,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub inserted: usize,
    pub skipped: usize,
}

/// Insert every record whose natural key is not stored yet.
///
/// Existing documents are never updated. An empty slice returns immediately
/// without touching the store.
pub async fn import_records<S: PlaceStore>(
    store: &S,
    records: &[PlaceRecord],
    strategy: DedupStrategy,
    pb: &ProgressBar,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary {
        total: records.len(),
        ..Default::default()
    };

    if records.is_empty() {
        return Ok(summary);
    }

    if strategy == DedupStrategy::Upsert {
        store.ensure_natural_key_index().await?;
    }

    for record in records {
        pb.inc(1);

        let inserted = match strategy {
            DedupStrategy::Lookup => {
                if store.exists(&record.natural_key()).await? {
                    false
                } else {
                    store.insert(record).await?;
                    true
                }
            }
            DedupStrategy::Upsert => store.insert_if_absent(record).await?,
        };

        if inserted {
            summary.inserted += 1;
        } else {
            debug!("Skipping existing place {}", record.natural_key());
            summary.skipped += 1;
        }
    }

    Ok(summary)
}
