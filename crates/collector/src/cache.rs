use slog::{debug, Logger};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
};
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

use crate::{Observation, QueryKey};

/// Source of "now", injected so expiry can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: StdMutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: StdMutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    observations: Arc<Vec<Observation>>,
    fetched_at: OffsetDateTime,
}

/// Classified sets by query key, each valid for `ttl` after it was fetched.
/// Staleness is only checked when a key is looked up.
pub struct ResultCache {
    logger: Logger,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
}

impl ResultCache {
    pub fn new(logger: Logger, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            logger,
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, key: &QueryKey) -> Option<Arc<Vec<Observation>>> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if self.clock.now() - entry.fetched_at < self.ttl => {
                debug!(self.logger, "cache hit: {}", key);
                Some(Arc::clone(&entry.observations))
            }
            Some(_) => {
                debug!(self.logger, "cache expired: {}", key);
                None
            }
            None => {
                debug!(self.logger, "cache miss: {}", key);
                None
            }
        }
    }

    /// Store a freshly fetched set, replacing whatever the key held.
    pub async fn insert(&self, key: QueryKey, observations: Vec<Observation>) -> Arc<Vec<Observation>> {
        let observations = Arc::new(observations);
        let entry = CacheEntry {
            observations: Arc::clone(&observations),
            fetched_at: self.clock.now(),
        };
        self.entries.lock().await.insert(key, entry);
        observations
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
