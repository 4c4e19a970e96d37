//! Recent-searches history.
//!
//! The history is a JSON array under [`STORAGE_KEY`]. On disk it may be in any
//! order and may contain foreign or damaged entries; on read it is filtered and
//! sorted newest first. Every write replaces the whole array.

use chrono::Utc;
use tracing::debug;

use crate::cache;
use crate::error::CacheError;
use crate::models::{Food, MAX_RECENT_SEARCHES, RecentSearch};
use crate::store::KeyValueStore;

pub const STORAGE_KEY: &str = "recent_searches";

pub struct RecentSearches<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> RecentSearches<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Valid entries, most recent first. Missing or unreadable content yields an
    /// empty history; only a storage failure is an error.
    pub fn load(&self) -> Result<Vec<RecentSearch>, CacheError> {
        let raw = cache::read_raw(self.store, STORAGE_KEY)?;
        let mut entries = raw.as_deref().map(decode).unwrap_or_default();
        // Stable: equal timestamps keep their stored order.
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    /// Record `food` as the latest search, stamped with the current time.
    pub fn record(&self, food: &Food) -> Result<Vec<RecentSearch>, CacheError> {
        self.record_at(food, Utc::now().timestamp_millis())
    }

    /// Record `food` with an explicit capture time (epoch milliseconds).
    ///
    /// A food without an id or name is ignored and the current history is
    /// returned unchanged.
    pub fn record_at(&self, food: &Food, timestamp: i64) -> Result<Vec<RecentSearch>, CacheError> {
        if !food.is_cacheable() {
            debug!(id = %food.id, name = %food.name, "not recording invalid food");
            return self.load();
        }

        let mut entries = self.load()?;
        entries.retain(|e| e.food.id != food.id);
        entries.insert(0, RecentSearch::new(food.clone(), timestamp));
        // Same order as `load`; ties keep the new entry in front.
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(MAX_RECENT_SEARCHES);

        self.persist(&entries)?;
        Ok(entries)
    }

    /// Drop the entry with `id`, if any.
    pub fn remove(&self, id: &str) -> Result<Vec<RecentSearch>, CacheError> {
        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|e| e.food.id != id);
        if entries.len() == before {
            return Ok(entries);
        }

        self.persist(&entries)?;
        Ok(entries)
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        cache::remove_key(self.store, STORAGE_KEY)?;
        debug!("cleared recent searches");
        Ok(())
    }

    fn persist(&self, entries: &[RecentSearch]) -> Result<(), CacheError> {
        cache::write_json(self.store, STORAGE_KEY, entries)?;
        debug!(count = entries.len(), "saved recent searches");
        Ok(())
    }
}

fn decode(raw: &str) -> Vec<RecentSearch> {
    cache::decode_lenient::<RecentSearch>(STORAGE_KEY, raw)
        .into_iter()
        .filter(|entry| {
            let valid = entry.is_valid();
            if !valid {
                debug!(id = %entry.food.id, "dropping invalid recent search");
            }
            valid
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::store::testing::FlakyStore;

    fn food(id: &str) -> Food {
        Food::new(id, format!("Food {id}"), 100.0)
    }

    fn ids(entries: &[RecentSearch]) -> Vec<&str> {
        entries.iter().map(|e| e.food.id.as_str()).collect()
    }

    #[test]
    fn test_load_empty_store() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);
        assert!(recent.load().unwrap().is_empty());
    }

    #[test]
    fn test_record_single_food() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);

        recent.record(&Food::new("a", "Apple", 52.0)).unwrap();

        let entries = recent.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].food.id, "a");
        assert_eq!(entries[0].food.name, "Apple");
        assert_eq!(entries[0].food.calories, 52.0);
        assert!(entries[0].timestamp > 0);

        // Stored shape is the food's columns plus the timestamp
        let stored: serde_json::Value =
            serde_json::from_str(&store.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(
            stored,
            serde_json::json!([{
                "id": "a",
                "nombre": "Apple",
                "calorias": 52.0,
                "timestamp": entries[0].timestamp
            }])
        );
    }

    #[test]
    fn test_distinct_records_newest_first_bounded() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);

        for i in 1..=14 {
            recent.record_at(&food(&i.to_string()), 1_000 + i).unwrap();
        }

        let entries = recent.load().unwrap();
        assert_eq!(
            ids(&entries),
            vec!["14", "13", "12", "11", "10", "9", "8", "7", "6", "5"]
        );
    }

    #[test]
    fn test_fewer_than_limit_reverse_order() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);

        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            recent.record_at(&food(id), 10 + i as i64).unwrap();
        }
        assert_eq!(ids(&recent.load().unwrap()), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_same_millisecond_keeps_insertion_recency() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);

        recent.record_at(&food("a"), 500).unwrap();
        recent.record_at(&food("b"), 500).unwrap();
        assert_eq!(ids(&recent.load().unwrap()), vec!["b", "a"]);
    }

    #[test]
    fn test_rerecord_moves_to_front_and_refreshes() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);

        recent.record_at(&food("a"), 1).unwrap();
        recent.record_at(&food("b"), 2).unwrap();
        recent.record_at(&food("c"), 3).unwrap();

        let entries = recent.record_at(&food("a"), 4).unwrap();
        assert_eq!(ids(&entries), vec!["a", "c", "b"]);

        let loaded = recent.load().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(ids(&loaded), vec!["a", "c", "b"]);
        assert_eq!(loaded[0].timestamp, 4);
    }

    #[test]
    fn test_rerecord_replaces_stale_fields() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);

        recent.record_at(&Food::new("a", "Apple", 52.0), 1).unwrap();
        recent.record_at(&Food::new("a", "Green apple", 48.0), 2).unwrap();

        let entries = recent.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].food.name, "Green apple");
    }

    #[test]
    fn test_eleventh_record_evicts_oldest() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);

        for i in 1..=10 {
            recent.record_at(&food(&i.to_string()), i).unwrap();
        }
        recent.record_at(&food("11"), 11).unwrap();

        let entries = recent.load().unwrap();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].food.id, "11");
        assert_eq!(entries[9].food.id, "2");
        assert!(entries.iter().all(|e| e.food.id != "1"));
    }

    #[test]
    fn test_eviction_uses_timestamps_not_stored_order() {
        let store = MemoryStore::new();
        // Stored oldest-first: "1" is the oldest despite sitting at index 0
        let stored: Vec<RecentSearch> = (1..=10)
            .map(|i| RecentSearch::new(food(&i.to_string()), i))
            .collect();
        store
            .set(STORAGE_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let recent = RecentSearches::new(&store);
        let entries = recent.record_at(&food("11"), 11).unwrap();
        assert_eq!(entries[0].food.id, "11");
        assert_eq!(entries[1].food.id, "10");
        assert!(entries.iter().all(|e| e.food.id != "1"));
    }

    #[test]
    fn test_record_returns_load_order_when_clock_goes_back() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);

        recent.record_at(&food("a"), 5_000).unwrap();
        let entries = recent.record_at(&food("b"), 100).unwrap();

        assert_eq!(ids(&entries), vec!["a", "b"]);
        assert_eq!(entries, recent.load().unwrap());
    }

    #[test]
    fn test_invalid_record_is_noop() {
        let store = FlakyStore::default();
        let recent = RecentSearches::new(&store);
        recent.record_at(&food("a"), 1).unwrap();
        let before = recent.load().unwrap();
        let writes = store.writes.get();

        let after = recent.record(&Food::new("", "No id", 10.0)).unwrap();
        assert_eq!(after, before);
        recent.record(&Food::new("b", "  ", 10.0)).unwrap();

        assert_eq!(recent.load().unwrap(), before);
        assert_eq!(store.writes.get(), writes);
    }

    #[test]
    fn test_load_drops_corrupt_entries() {
        let store = MemoryStore::new();
        store
            .set(
                STORAGE_KEY,
                r#"[
                    {"id":"a","nombre":"Apple","calorias":52,"timestamp":10},
                    {"id":"b","nombre":"Bread","calorias":265},
                    {"nombre":"No id","calorias":1,"timestamp":11},
                    {"id":"c","nombre":"","calorias":1,"timestamp":12},
                    {"id":"d","nombre":"Date","calorias":282,"timestamp":0},
                    null,
                    42,
                    {"id":"e","nombre":"Egg","calorias":155,"timestamp":20}
                ]"#,
            )
            .unwrap();

        let entries = RecentSearches::new(&store).load().unwrap();
        assert_eq!(ids(&entries), vec!["e", "a"]);
    }

    #[test]
    fn test_load_unparsable_is_empty() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        assert!(RecentSearches::new(&store).load().unwrap().is_empty());

        store.set(STORAGE_KEY, r#"{"id":"a"}"#).unwrap();
        assert!(RecentSearches::new(&store).load().unwrap().is_empty());
    }

    #[test]
    fn test_load_sorts_descending() {
        let store = MemoryStore::new();
        store
            .set(
                STORAGE_KEY,
                r#"[
                    {"id":"old","nombre":"Old","calorias":1,"timestamp":100},
                    {"id":"new","nombre":"New","calorias":1,"timestamp":300},
                    {"id":"mid","nombre":"Mid","calorias":1,"timestamp":200}
                ]"#,
            )
            .unwrap();
        let entries = RecentSearches::new(&store).load().unwrap();
        assert_eq!(ids(&entries), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);
        recent.record_at(&food("a"), 1).unwrap();
        recent.record_at(&food("b"), 2).unwrap();

        let entries = recent.remove("a").unwrap();
        assert_eq!(ids(&entries), vec!["b"]);
        assert_eq!(ids(&recent.load().unwrap()), vec!["b"]);
    }

    #[test]
    fn test_remove_absent_does_not_write() {
        let store = FlakyStore::default();
        let recent = RecentSearches::new(&store);
        recent.record_at(&food("a"), 1).unwrap();
        let writes = store.writes.get();

        let entries = recent.remove("zzz").unwrap();
        assert_eq!(ids(&entries), vec!["a"]);
        assert_eq!(store.writes.get(), writes);
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);
        recent.record_at(&food("a"), 1).unwrap();
        recent.record_at(&food("b"), 2).unwrap();

        recent.clear().unwrap();
        assert!(recent.load().unwrap().is_empty());

        // Clearing an empty history is fine too
        recent.clear().unwrap();
        assert!(recent.load().unwrap().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_storage_unchanged() {
        let store = FlakyStore::default();
        let recent = RecentSearches::new(&store);
        recent.record_at(&food("a"), 1).unwrap();

        store.fail_writes.set(true);
        let err = recent.record_at(&food("b"), 2).unwrap_err();
        assert!(matches!(err, CacheError::Write { key: STORAGE_KEY, .. }));
        assert!(recent.clear().is_err());

        store.fail_writes.set(false);
        assert_eq!(ids(&recent.load().unwrap()), vec!["a"]);
    }

    #[test]
    fn test_failed_read_is_error() {
        let store = FlakyStore::default();
        store.fail_reads.set(true);
        let err = RecentSearches::new(&store).load().unwrap_err();
        assert!(matches!(err, CacheError::Read { .. }));
    }

    #[test]
    fn test_scenario_apple() {
        let store = MemoryStore::new();
        let recent = RecentSearches::new(&store);
        recent.record(&Food::new("a", "Apple", 52.0)).unwrap();

        let entries = recent.load().unwrap();
        let json = serde_json::to_value(&entries).unwrap();
        let t = entries[0].timestamp;
        assert_eq!(
            json,
            serde_json::json!([{"id": "a", "nombre": "Apple", "calorias": 52.0, "timestamp": t}])
        );
    }
}
