//! Read-through cache of remote query results.
//!
//! Mutations never patch cached ranges. A successful create, update, or
//! delete marks every entry in the `events` and `metrics` namespaces
//! stale and the next read refetches -- some extra refetch cost, but the
//! cache can never diverge from the server after a partial multi-week
//! update. Marking stale twice is harmless.

use std::collections::HashMap;

use bookcal_core::Event;

/// Key namespaces invalidated together after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Events,
    Metrics,
}

/// Per-week booking summary, cached under the `metrics` namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekMetrics {
    pub event_count: usize,
    pub booked_hours: f64,
}

#[derive(Debug, Clone)]
enum CachedValue {
    Events(Vec<Event>),
    Metrics(WeekMetrics),
}

#[derive(Debug, Clone)]
struct Entry {
    value: CachedValue,
    stale: bool,
}

/// Query cache keyed by namespace plus query key.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<(Namespace, String), Entry>,
}

impl QueryCache {
    pub fn new() -> QueryCache {
        QueryCache::default()
    }

    /// Fresh cached events for `key`, if any.
    pub fn events(&self, key: &str) -> Option<&[Event]> {
        match self.fresh(Namespace::Events, key)? {
            CachedValue::Events(events) => Some(events),
            CachedValue::Metrics(_) => None,
        }
    }

    /// Fresh cached metrics for `key`, if any.
    pub fn metrics(&self, key: &str) -> Option<&WeekMetrics> {
        match self.fresh(Namespace::Metrics, key)? {
            CachedValue::Metrics(metrics) => Some(metrics),
            CachedValue::Events(_) => None,
        }
    }

    fn fresh(&self, namespace: Namespace, key: &str) -> Option<&CachedValue> {
        self.entries
            .get(&(namespace, key.to_string()))
            .filter(|entry| !entry.stale)
            .map(|entry| &entry.value)
    }

    pub fn put_events(&mut self, key: impl Into<String>, events: Vec<Event>) {
        self.entries.insert(
            (Namespace::Events, key.into()),
            Entry {
                value: CachedValue::Events(events),
                stale: false,
            },
        );
    }

    pub fn put_metrics(&mut self, key: impl Into<String>, metrics: WeekMetrics) {
        self.entries.insert(
            (Namespace::Metrics, key.into()),
            Entry {
                value: CachedValue::Metrics(metrics),
                stale: false,
            },
        );
    }

    /// Mark every entry in `namespace` stale. Idempotent.
    pub fn invalidate(&mut self, namespace: Namespace) {
        for ((ns, _), entry) in self.entries.iter_mut() {
            if *ns == namespace {
                entry.stale = true;
            }
        }
    }

    /// The post-mutation contract: both namespaces go stale together.
    pub fn invalidate_after_mutation(&mut self) {
        self.invalidate(Namespace::Events);
        self.invalidate(Namespace::Metrics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            client_id: None,
            title: id.to_string(),
            start: Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn read_through_returns_what_was_put() {
        let mut cache = QueryCache::new();
        assert!(cache.events("wk").is_none());

        cache.put_events("wk", vec![event("a")]);
        assert_eq!(cache.events("wk").unwrap().len(), 1);
        assert!(cache.events("other").is_none());
    }

    #[test]
    fn stale_entries_are_not_served() {
        let mut cache = QueryCache::new();
        cache.put_events("wk", vec![event("a")]);
        cache.put_metrics(
            "0",
            WeekMetrics {
                event_count: 1,
                booked_hours: 1.0,
            },
        );

        cache.invalidate_after_mutation();
        assert!(cache.events("wk").is_none());
        assert!(cache.metrics("0").is_none());
    }

    #[test]
    fn invalidation_is_idempotent() {
        let mut cache = QueryCache::new();
        cache.put_events("wk", vec![event("a")]);
        cache.invalidate(Namespace::Events);
        cache.invalidate(Namespace::Events);
        assert!(cache.events("wk").is_none());
    }

    #[test]
    fn invalidation_is_scoped_to_the_namespace() {
        let mut cache = QueryCache::new();
        cache.put_events("wk", vec![event("a")]);
        cache.put_metrics(
            "0",
            WeekMetrics {
                event_count: 1,
                booked_hours: 1.0,
            },
        );

        cache.invalidate(Namespace::Metrics);
        assert!(cache.events("wk").is_some());
        assert!(cache.metrics("0").is_none());
    }

    #[test]
    fn repopulating_a_stale_key_makes_it_fresh() {
        let mut cache = QueryCache::new();
        cache.put_events("wk", vec![event("a")]);
        cache.invalidate(Namespace::Events);

        cache.put_events("wk", vec![event("a"), event("b")]);
        assert_eq!(cache.events("wk").unwrap().len(), 2);
    }
}
