//! Data fixes run against an imported place collection.

use anyhow::Result;
use tracing::{debug, info};

use crate::models::PlaceStatus;
use crate::store::MaintenanceStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneSummary {
    pub places: usize,
    pub statuses: u64,
}

/// Delete every place of `category` along with its status documents
pub async fn prune_category<S: MaintenanceStore>(store: &S, category: &str) -> Result<PruneSummary> {
    let places = store.places_in_category(category).await?;
    info!("Found {} places with category '{}'", places.len(), category);

    let mut summary = PruneSummary::default();
    for place in places {
        summary.statuses += store.delete_place(place.id).await?;
        summary.places += 1;
        info!("Deleted {} ({})", place.name, place.id);
    }

    Ok(summary)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub places: usize,
    pub created: usize,
    pub existing: usize,
}

/// Give every place without a status document a default one
pub async fn seed_statuses<S: MaintenanceStore>(store: &S) -> Result<SeedSummary> {
    let places = store.all_places().await?;
    info!("Found {} places", places.len());

    let mut summary = SeedSummary {
        places: places.len(),
        ..Default::default()
    };

    for place in &places {
        if store.has_status(place.id).await? {
            debug!(
                "Status already exists for {} (category: {})",
                place.name, place.category
            );
            summary.existing += 1;
            continue;
        }

        store.insert_status(&PlaceStatus::defaults_for(place)).await?;
        debug!("Created status for {} (category: {})", place.name, place.category);
        summary.created += 1;
    }

    Ok(summary)
}
