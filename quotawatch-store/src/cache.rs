//! Two-tier usage snapshot cache.
//!
//! A TTL-gated "fresh" slot avoids redundant network calls between polls,
//! while a TTL-ignoring "last known" slot survives invalidation so callers
//! can show a best-effort value after a failed fetch. The fetch path never
//! serves last-known implicitly; callers must ask for it.

use std::time::Duration;

use quotawatch_core::UsageSnapshot;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Fresh-slot time to live.
const FRESH_TTL: Duration = Duration::from_secs(10);

struct CacheInner {
    fresh: Option<(UsageSnapshot, Instant)>,
    last_known: Option<UsageSnapshot>,
}

/// Two-tier snapshot cache, serialized internally.
pub struct UsageCache {
    inner: Mutex<CacheInner>,
    ttl: Duration,
}

impl UsageCache {
    /// Creates a cache with the standard 10-second TTL.
    pub fn new() -> Self {
        Self::with_ttl(FRESH_TTL)
    }

    /// Creates a cache with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                fresh: None,
                last_known: None,
            }),
            ttl,
        }
    }

    /// Returns the fresh slot if it is within the TTL.
    ///
    /// Does not fall back to last-known.
    pub async fn get(&self) -> Option<UsageSnapshot> {
        let inner = self.inner.lock().await;
        match &inner.fresh {
            Some((snapshot, stored_at)) if stored_at.elapsed() <= self.ttl => {
                debug!("Cache hit");
                Some(snapshot.clone())
            }
            _ => None,
        }
    }

    /// Stores a snapshot into both slots unconditionally.
    pub async fn set(&self, snapshot: UsageSnapshot) {
        let mut inner = self.inner.lock().await;
        inner.fresh = Some((snapshot.clone(), Instant::now()));
        inner.last_known = Some(snapshot);
    }

    /// Clears the fresh slot; last-known is preserved for offline display.
    pub async fn invalidate(&self) {
        self.inner.lock().await.fresh = None;
        debug!("Cache invalidated");
    }

    /// Returns the last stored snapshot, ignoring the TTL entirely.
    pub async fn get_last_known(&self) -> Option<UsageSnapshot> {
        self.inner.lock().await.last_known.clone()
    }
}

impl Default for UsageCache {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quotawatch_core::UsageWindow;

    fn snapshot(percentage: f64) -> UsageSnapshot {
        let resets_at = Utc::now() + chrono::Duration::hours(1);
        UsageSnapshot {
            session: UsageWindow::new(percentage, resets_at),
            weekly: UsageWindow::new(10.0, resets_at),
            sonnet: None,
            last_updated: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache = UsageCache::new();
        assert!(cache.get().await.is_none());
        assert!(cache.get_last_known().await.is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let cache = UsageCache::new();
        let s = snapshot(42.0);

        cache.set(s.clone()).await;
        assert_eq!(cache.get().await, Some(s.clone()));
        assert_eq!(cache.get_last_known().await, Some(s));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_slot_expires_but_last_known_survives() {
        let cache = UsageCache::new();
        let s = snapshot(42.0);
        cache.set(s.clone()).await;

        tokio::time::advance(Duration::from_secs(11)).await;

        assert!(cache.get().await.is_none());
        assert_eq!(cache.get_last_known().await, Some(s));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_slot_valid_at_ttl_boundary() {
        let cache = UsageCache::new();
        cache.set(snapshot(42.0)).await;

        tokio::time::advance(Duration::from_secs(10)).await;

        assert!(cache.get().await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_preserves_last_known() {
        let cache = UsageCache::new();
        let s = snapshot(42.0);
        cache.set(s.clone()).await;

        cache.invalidate().await;

        assert!(cache.get().await.is_none());
        assert_eq!(cache.get_last_known().await, Some(s));
    }

    #[tokio::test]
    async fn test_set_overwrites_both_slots() {
        let cache = UsageCache::new();
        cache.set(snapshot(10.0)).await;
        cache.set(snapshot(90.0)).await;

        assert_eq!(cache.get().await.unwrap().session.percentage(), 90.0);
        assert_eq!(
            cache.get_last_known().await.unwrap().session.percentage(),
            90.0
        );
    }
}
