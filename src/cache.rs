use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
pub struct TtlCache<K, V, C = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: HashMap<K, (DateTime<Utc>, V)>,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock,
{
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let fresh = match self.entries.get(key) {
            Some((inserted_at, _)) => now - *inserted_at < self.ttl,
            None => return None,
        };

        if fresh {
            self.entries.get(key).map(|(_, value)| value.clone())
        } else {
            self.entries.remove(key);
            None
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        let now = self.clock.now();
        self.entries.insert(key, (now, value));
    }

    pub async fn get_or_try_insert_with<F, Fut, E>(&mut self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct ManualClock(Rc<Cell<DateTime<Utc>>>);

    impl ManualClock {
        fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.0.get()
        }
    }

    fn manual() -> ManualClock {
        let start = DateTime::parse_from_rfc3339("2026-03-01T09:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        ManualClock(Rc::new(Cell::new(start)))
    }

    #[test]
    fn entries_expire_after_ttl() {
        let clock = manual();
        let mut cache = TtlCache::with_clock(Duration::seconds(60), clock.clone());
        cache.insert("Computer Engineering".to_string(), 42usize);

        clock.advance(Duration::seconds(59));
        assert_eq!(cache.get(&"Computer Engineering".to_string()), Some(42));

        clock.advance(Duration::seconds(1));
        assert_eq!(cache.get(&"Computer Engineering".to_string()), None);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn fetch_runs_once_while_fresh() {
        let clock = manual();
        let mut cache = TtlCache::with_clock(Duration::seconds(30), clock.clone());
        let mut calls = 0;

        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with("market", || {
                    calls += 1;
                    async { Ok::<_, String>("jobs") }
                })
                .await;
            assert_eq!(value, Ok("jobs"));
        }
        assert_eq!(calls, 1);

        clock.advance(Duration::seconds(31));
        let _ = cache
            .get_or_try_insert_with("market", || {
                calls += 1;
                async { Ok::<_, String>("jobs") }
            })
            .await;
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let mut cache = TtlCache::with_clock(Duration::seconds(30), manual());

        let failed = cache
            .get_or_try_insert_with("market", || async { Err::<&str, _>("timeout") })
            .await;
        assert_eq!(failed, Err("timeout"));
        assert_eq!(cache.len(), 0);

        let value = cache
            .get_or_try_insert_with("market", || async { Ok::<_, &str>("jobs") })
            .await;
        assert_eq!(value, Ok("jobs"));
    }
}
