//! Periodic Expiry Sweep
//!
//! Background task that periodically removes expired cache entries, so keys
//! that are never read again still get reclaimed.

use std::hash::Hash;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

/// Handle to a running sweep task.
///
/// Call [`SweepHandle::stop`] to shut the task down and wait for it. Dropping
/// the handle signals shutdown without waiting.
#[derive(Debug)]
pub struct SweepHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    period: Duration,
}

impl SweepHandle {
    /// Stops the sweep and waits for the task to exit.
    ///
    /// Once this returns no further sweep runs against the cache.
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);

        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "Sweep task ended abnormally");
            }
        }

        info!(period_ms = self.period.as_millis() as u64, "Expiry sweep stopped");
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.shutdown_tx.send(true);
            debug!("Sweep handle dropped, signalling shutdown");
        }
    }
}

/// Spawns a background task that runs the expiry scan every `period`.
///
/// The first scan runs immediately. Scans of one task never overlap, and a
/// scan that overruns the period skips the missed ticks instead of bursting.
/// Every scan takes the cache lock, so several sweeps started on the same
/// cache are serialized against each other and against foreground calls.
///
/// # Errors
/// `InvalidConfiguration` if `period` is zero.
///
/// # Panics
/// When called outside a Tokio runtime.
///
/// # Example
/// ```ignore
/// let cache: Cache<String, String> = Cache::new(Some(Duration::from_secs(30)), 1000)?;
/// let sweep = spawn_sweep_task(cache.clone(), Duration::from_secs(2))?;
/// // Later, during shutdown:
/// sweep.stop().await;
/// ```
pub fn spawn_sweep_task<K, V>(cache: Cache<K, V>, period: Duration) -> Result<SweepHandle>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    if period.is_zero() {
        return Err(CacheError::InvalidConfiguration(
            "sweep period must be greater than zero".to_string(),
        ));
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(sweep_loop(cache, period, shutdown_rx));

    info!(period_ms = period.as_millis() as u64, "Expiry sweep started");

    Ok(SweepHandle {
        shutdown_tx,
        task: Some(task),
        period,
    })
}

/// Spawns a sweep using the configured interval.
pub fn spawn_sweep_task_from_config<K, V>(
    cache: Cache<K, V>,
    config: &CacheConfig,
) -> Result<SweepHandle>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    spawn_sweep_task(cache, config.sweep_interval)
}

async fn sweep_loop<K, V>(
    cache: Cache<K, V>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    K: Eq + Hash,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweep received shutdown signal");
                    return;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let removed = cache.clean();

        if removed > 0 {
            debug!(removed, remaining = cache.len(), "Expiry sweep removed entries");
        } else {
            trace!("Expiry sweep found no expired entries");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_cache() -> Cache<String, String> {
        Cache::new(None, 100).unwrap()
    }

    #[tokio::test]
    async fn test_sweep_removes_unread_expired_entries() {
        let cache = new_cache();
        cache
            .add_with_ttl(
                "expire_soon".to_string(),
                "value".to_string(),
                Some(Duration::from_millis(50)),
            )
            .unwrap();
        cache.add("long_lived".to_string(), "value".to_string()).unwrap();

        let sweep = spawn_sweep_task(cache.clone(), Duration::from_millis(20)).unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;

        // len() does not scan, so only the sweep can have shrunk the cache
        assert_eq!(cache.len(), 1);
        assert!(cache.contains_key("long_lived"));
        assert_eq!(cache.stats().expirations, 1);

        sweep.stop().await;
    }

    #[tokio::test]
    async fn test_sweep_first_run_is_immediate() {
        let cache = new_cache();
        cache
            .add_with_ttl("stale".to_string(), "value".to_string(), Some(Duration::ZERO))
            .unwrap();

        let sweep = spawn_sweep_task(cache.clone(), Duration::from_secs(3600)).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(cache.is_empty());
        sweep.stop().await;
    }

    #[tokio::test]
    async fn test_sweep_stop_prevents_further_runs() {
        let cache = new_cache();
        let sweep = spawn_sweep_task(cache.clone(), Duration::from_millis(10)).unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        sweep.stop().await;

        cache
            .add_with_ttl("stale".to_string(), "value".to_string(), Some(Duration::ZERO))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.len(), 1, "No sweep should run after stop returns");
    }

    #[tokio::test]
    async fn test_sweep_stops_on_drop() {
        let cache = new_cache();

        {
            let sweep = spawn_sweep_task(cache.clone(), Duration::from_millis(10)).unwrap();
            tokio::time::sleep(Duration::from_millis(30)).await;
            assert!(!sweep.is_finished());
        }

        // Let the task observe the shutdown signal
        tokio::time::sleep(Duration::from_millis(30)).await;

        cache
            .add_with_ttl("stale".to_string(), "value".to_string(), Some(Duration::ZERO))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.len(), 1);
        // A read still reclaims it lazily
        assert!(cache.get("stale").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_sweeps_do_not_double_count() {
        let cache = new_cache();
        for i in 0..40 {
            cache
                .add_with_ttl(format!("key{}", i), "value".to_string(), Some(Duration::from_millis(20)))
                .unwrap();
        }

        let first = spawn_sweep_task(cache.clone(), Duration::from_millis(5)).unwrap();
        let second = spawn_sweep_task(cache.clone(), Duration::from_millis(7)).unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.is_empty());
        assert_eq!(cache.stats().expirations, 40);

        first.stop().await;
        second.stop().await;
    }

    #[tokio::test]
    async fn test_sweep_rejects_zero_period() {
        let result = spawn_sweep_task(new_cache(), Duration::ZERO);
        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));
    }

    #[tokio::test]
    async fn test_sweep_from_config() {
        let config = CacheConfig {
            sweep_interval: Duration::from_millis(15),
            ..CacheConfig::default()
        };

        let sweep = spawn_sweep_task_from_config(new_cache(), &config).unwrap();
        assert_eq!(sweep.period(), Duration::from_millis(15));

        sweep.stop().await;
    }
}
