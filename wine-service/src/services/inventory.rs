//! In-memory snapshot of the wine table.
//!
//! Chat endpoints embed the whole inventory in every prompt, so the list is
//! kept in memory and replaced wholesale on refresh instead of being queried
//! per request.

use super::database::{StoreError, WineStore};
use crate::models::WineRecord;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

struct Snapshot {
    wines: Arc<Vec<WineRecord>>,
    refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct InventoryCache {
    store: Arc<dyn WineStore>,
    snapshot: Arc<RwLock<Snapshot>>,
}

impl InventoryCache {
    /// An empty cache; call [`refresh`](Self::refresh) to populate it.
    pub fn new(store: Arc<dyn WineStore>) -> Self {
        Self {
            store,
            snapshot: Arc::new(RwLock::new(Snapshot {
                wines: Arc::new(Vec::new()),
                refreshed_at: None,
            })),
        }
    }

    /// Fetch every wine and swap it in. On failure the previous snapshot
    /// stays in place.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let wines = match self.store.list_wines().await {
            Ok(wines) => wines,
            Err(e) => {
                tracing::warn!(error = %e, "Inventory refresh failed, keeping previous snapshot");
                return Err(e);
            }
        };

        let count = wines.len();
        {
            let mut snapshot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
            snapshot.wines = Arc::new(wines);
            snapshot.refreshed_at = Some(Utc::now());
        }

        tracing::info!(count, "Inventory refreshed");
        Ok(count)
    }

    /// The current snapshot. Never touches the store.
    pub fn read(&self) -> Arc<Vec<WineRecord>> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .wines
            .clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// When the last successful refresh happened, if ever.
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .refreshed_at
    }

    pub fn store(&self) -> &Arc<dyn WineStore> {
        &self.store
    }
}
