//! Shared cache of built recombination tables.

use super::recombination::{RecombinationMap, RecombinationTable, RecombinationTableBuilder};
use crate::errors::SimError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Key: locus count plus the exact bit patterns of the fractions.
type CacheKey = (usize, Vec<u64>);

/// Keeps one immutable table per `(L, map)` so trials and repeated runs with
/// the same map reuse it.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: Mutex<HashMap<CacheKey, Arc<RecombinationTable>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(loci: usize, map: &RecombinationMap) -> CacheKey {
        (loci, map.fractions().iter().map(|r| r.to_bits()).collect())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<RecombinationTable>>> {
        // Tables are only inserted whole, so a poisoned map is still consistent.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the cached table for `(loci, map)`, building it on a miss.
    ///
    /// The build runs without holding the lock; if two callers race, the
    /// first inserted table wins and both receive it.
    pub fn get_or_build(
        &self,
        loci: usize,
        map: &RecombinationMap,
    ) -> Result<Arc<RecombinationTable>, SimError> {
        let key = Self::key(loci, map);
        if let Some(table) = self.lock().get(&key) {
            tracing::trace!(loci, "recombination table cache hit");
            return Ok(Arc::clone(table));
        }

        let built = Arc::new(RecombinationTableBuilder::new(loci, map.clone())?.build()?);
        let mut tables = self.lock();
        Ok(Arc::clone(tables.entry(key).or_insert(built)))
    }

    /// Add an externally built or restored table.
    pub fn insert(&self, table: RecombinationTable) -> Arc<RecombinationTable> {
        let key = Self::key(table.space().loci(), table.map());
        let table = Arc::new(table);
        self.lock().insert(key, Arc::clone(&table));
        table
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuses_tables() {
        let cache = TableCache::new();
        let map = RecombinationMap::uniform(3, 0.2).unwrap();
        let a = cache.get_or_build(3, &map).unwrap();
        let b = cache.get_or_build(3, &map).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let other = RecombinationMap::uniform(3, 0.3).unwrap();
        let c = cache.get_or_build(3, &other).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_build_errors_are_not_cached() {
        let cache = TableCache::new();
        let map = RecombinationMap::uniform(3, 0.2).unwrap();
        assert!(cache.get_or_build(4, &map).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_then_hit() {
        let cache = TableCache::new();
        let table = RecombinationTable::build(2, &[0.1]).unwrap();
        let inserted = cache.insert(table);
        let map = RecombinationMap::new(vec![0.1]).unwrap();
        let hit = cache.get_or_build(2, &map).unwrap();
        assert!(Arc::ptr_eq(&inserted, &hit));
        cache.clear();
        assert!(cache.is_empty());
    }
}
