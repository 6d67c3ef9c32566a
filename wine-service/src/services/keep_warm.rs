//! Keep-warm timer.
//!
//! Free hosting tiers suspend idle processes. While running, the timer
//! refreshes the inventory on a fixed interval and, when a URL is configured,
//! pings it so the host sees traffic.

use super::inventory::InventoryCache;
use super::providers::http_client;
use crate::config::KeepWarmConfig;
use reqwest::Client;
use service_core::observability::TracedClientExt;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Upper bound on a single ping, so a hung URL cannot hold up later ticks.
const PING_TIMEOUT: Duration = Duration::from_secs(30);

pub struct KeepWarm {
    inventory: InventoryCache,
    client: Client,
    ping_url: Option<String>,
    interval: Duration,
    /// `Some` while running; cancelling the token ends the task.
    running: Mutex<Option<CancellationToken>>,
}

impl KeepWarm {
    pub fn new(inventory: InventoryCache, config: &KeepWarmConfig) -> Self {
        Self {
            inventory,
            client: http_client(config.interval().min(PING_TIMEOUT)),
            ping_url: config.url.clone(),
            interval: config.interval(),
            running: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Start the periodic task. Returns `false` if it was already running.
    ///
    /// The first tick fires one full interval after the call.
    pub fn start(&self) -> bool {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        if running.is_some() {
            tracing::debug!("Keep-warm timer already running");
            return false;
        }

        let token = CancellationToken::new();
        let task = Ticker {
            inventory: self.inventory.clone(),
            client: self.client.clone(),
            ping_url: self.ping_url.clone(),
        };
        let period = self.interval;
        let cancelled = token.clone();

        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticks.tick() => task.tick().await,
                }
            }

            tracing::debug!("Keep-warm task exited");
        });

        *running = Some(token);
        tracing::info!(
            interval_secs = period.as_secs(),
            ping_url = ?self.ping_url,
            "Keep-warm timer started"
        );
        true
    }

    /// Stop the periodic task. Returns `false` if it was not running.
    pub fn stop(&self) -> bool {
        let token = self
            .running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        match token {
            Some(token) => {
                token.cancel();
                tracing::info!("Keep-warm timer stopped");
                true
            }
            None => {
                tracing::debug!("Keep-warm timer already stopped");
                false
            }
        }
    }
}

impl Drop for KeepWarm {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Ticker {
    inventory: InventoryCache,
    client: Client,
    ping_url: Option<String>,
}

impl Ticker {
    async fn tick(&self) {
        // Failures are logged by the cache.
        let _ = self.inventory.refresh().await;

        if let Some(url) = &self.ping_url {
            match self.client.traced_get(url).send().await {
                Ok(response) => {
                    tracing::debug!(url = %url, status = %response.status(), "Keep-warm ping sent")
                }
                Err(e) => tracing::warn!(url = %url, error = %e, "Keep-warm ping failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory_store::MemoryStore;
    use std::sync::Arc;

    const PERIOD: Duration = Duration::from_secs(600);

    fn timer(store: Arc<MemoryStore>) -> KeepWarm {
        let inventory = InventoryCache::new(store);
        KeepWarm::new(
            inventory,
            &KeepWarmConfig {
                url: None,
                interval_secs: PERIOD.as_secs(),
                autostart: false,
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_once_per_interval() {
        let store = Arc::new(MemoryStore::new());
        let keep_warm = timer(store.clone());

        assert!(keep_warm.start());
        tokio::time::sleep(PERIOD * 3 + Duration::from_millis(10)).await;

        assert_eq!(store.list_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_does_not_double_the_cadence() {
        let store = Arc::new(MemoryStore::new());
        let keep_warm = timer(store.clone());

        assert!(keep_warm.start());
        assert!(!keep_warm.start());
        tokio::time::sleep(PERIOD * 2 + Duration::from_millis(10)).await;

        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_refreshes() {
        let store = Arc::new(MemoryStore::new());
        let keep_warm = timer(store.clone());

        keep_warm.start();
        tokio::time::sleep(PERIOD + Duration::from_millis(10)).await;
        assert!(keep_warm.stop());
        tokio::time::sleep(PERIOD * 3).await;

        assert_eq!(store.list_calls(), 1);
        assert!(!keep_warm.is_running());
    }

    #[tokio::test]
    async fn stop_when_stopped_is_a_no_op() {
        let keep_warm = timer(Arc::new(MemoryStore::new()));

        assert!(!keep_warm.is_running());
        assert!(!keep_warm.stop());
        assert!(!keep_warm.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn can_restart_after_stop() {
        let store = Arc::new(MemoryStore::new());
        let keep_warm = timer(store.clone());

        assert!(keep_warm.start());
        assert!(keep_warm.stop());
        assert!(keep_warm.start());
        assert!(keep_warm.is_running());
        tokio::time::sleep(PERIOD + Duration::from_millis(10)).await;

        assert_eq!(store.list_calls(), 1);
    }
}
