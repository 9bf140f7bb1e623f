//! Thread-safe in-memory record store.
//!
//! [`RecordStore`] keys records by identifier behind a
//! `parking_lot::RwLock`, and ranks its contents against a query record.
//!
//! # Usage
//!
//! ```
//! use fuzzyrank::ranking::RankOptions;
//! use fuzzyrank::schema::IssueFeatures;
//! use fuzzyrank::store::RecordStore;
//!
//! let store = RecordStore::new();
//! store.set_record("1", IssueFeatures {
//!     operation: Some("Turn on the switch".into()),
//!     ..Default::default()
//! })?;
//!
//! let query = IssueFeatures {
//!     operation: Some("Turn on the switch".into()),
//!     ..Default::default()
//! };
//! let result = store.find_similar(&query, &RankOptions::default())?;
//! assert_eq!(result.matches[0].candidate.id, "1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Concurrency Notes
//!
//! - Reads (get, snapshot) take a shared lock
//! - Writes (set, remove, preload) take an exclusive lock
//! - Ranking clones a snapshot and releases the lock before scoring, so
//!   a long ranking call never blocks writers

use crate::error::{Result, StoreError};
use crate::ranking::{rank_parallel_async, rank_parallel_with, RankOptions, RankingResult};
use crate::schema::{KeyedRecord, Record};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Keyed record collection, cheap to clone and share across threads.
///
/// Records are kept in identifier order, which fixes the candidate order
/// (and therefore tie order) seen by the rankers.
#[derive(Debug)]
pub struct RecordStore<R> {
    inner: Arc<RwLock<BTreeMap<String, R>>>,
}

impl<R> Clone for RecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a store preloaded with `records`.
    ///
    /// Invalid records are skipped as in [`RecordStore::preload`].
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = KeyedRecord<R>>,
    {
        let store = Self::new();
        store.preload(records);
        store
    }

    /// Replace the store's contents with `records`.
    ///
    /// Records with an empty id or no text in any field are skipped. Returns
    /// the number of records kept.
    pub fn preload<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = KeyedRecord<R>>,
    {
        let mut skipped = 0usize;
        let map: BTreeMap<String, R> = records
            .into_iter()
            .filter(|keyed| {
                let valid = validate(keyed).is_ok();
                skipped += usize::from(!valid);
                valid
            })
            .map(|keyed| (keyed.id, keyed.record))
            .collect();

        let kept = map.len();
        *self.inner.write() = map;
        tracing::debug!(kept, skipped, "preloaded record store");
        kept
    }

    /// Insert or replace the record stored under `id`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::EmptyId`] when `id` is empty
    /// - [`StoreError::EmptyRecord`] when no field of `record` has text
    pub fn set_record(
        &self,
        id: impl Into<String>,
        record: R,
    ) -> std::result::Result<(), StoreError> {
        let keyed = KeyedRecord::new(id, record);
        validate(&keyed)?;
        self.inner.write().insert(keyed.id, keyed.record);
        Ok(())
    }

    /// Get a copy of the record stored under `id`.
    pub fn get_record(&self, id: &str) -> Option<KeyedRecord<R>> {
        self.inner
            .read()
            .get(id)
            .map(|record| KeyedRecord::new(id, record.clone()))
    }

    /// Remove the record stored under `id`. Returns whether it existed.
    pub fn remove_record(&self, id: &str) -> bool {
        self.inner.write().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Copy of all records in identifier order.
    pub fn snapshot(&self) -> Vec<KeyedRecord<R>> {
        self.inner
            .read()
            .iter()
            .map(|(id, record)| KeyedRecord::new(id.clone(), record.clone()))
            .collect()
    }

    /// Rank the stored records against `query` on rayon.
    ///
    /// # Errors
    ///
    /// See [`rank_parallel_with`].
    pub fn find_similar(
        &self,
        query: &R,
        options: &RankOptions,
    ) -> Result<RankingResult<KeyedRecord<R>>> {
        let query = KeyedRecord::new(String::new(), query.clone());
        rank_parallel_with(&query, &self.snapshot(), options)
    }

    /// Rank the stored records against `query` on tokio's blocking pool.
    ///
    /// # Errors
    ///
    /// See [`rank_parallel_async`].
    pub async fn find_similar_async(
        &self,
        query: R,
        options: RankOptions,
    ) -> Result<RankingResult<KeyedRecord<R>>>
    where
        R: 'static,
    {
        let query = Arc::new(KeyedRecord::new(String::new(), query));
        rank_parallel_async(query, self.snapshot(), options).await
    }
}

fn validate<R: Record>(keyed: &KeyedRecord<R>) -> std::result::Result<(), StoreError> {
    if keyed.id.is_empty() {
        return Err(StoreError::EmptyId);
    }
    if !keyed.record.has_text() {
        return Err(StoreError::EmptyRecord(keyed.id.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RankError;
    use crate::schema::{IssueFeatures, PostData};
    use std::thread;

    fn features(
        operation: Option<&str>,
        phenomenon: Option<&str>,
        expected: Option<&str>,
        actual: Option<&str>,
    ) -> IssueFeatures {
        IssueFeatures {
            operation: operation.map(Into::into),
            phenomenon: phenomenon.map(Into::into),
            expected_behavior: expected.map(Into::into),
            actual_behavior: actual.map(Into::into),
        }
    }

    fn switch_on() -> IssueFeatures {
        features(
            Some("Turn on the switch"),
            None,
            Some("The device is turned on"),
            Some("The device is not turned on"),
        )
    }

    fn switch_off() -> IssueFeatures {
        features(
            Some("Turn off the switch"),
            Some("The device remains turned on instead if being turned on"),
            None,
            None,
        )
    }

    #[test]
    fn test_preload_skips_invalid() {
        let store = RecordStore::new();
        let kept = store.preload(vec![
            KeyedRecord::new("1", switch_on()),
            KeyedRecord::new("2", switch_off()),
            KeyedRecord::new("3", IssueFeatures::default()),
            KeyedRecord::new("", switch_on()),
        ]);

        assert_eq!(kept, 2);
        assert_eq!(store.get_record("1").unwrap().record, switch_on());
        assert_eq!(store.get_record("2").unwrap().record, switch_off());
        assert!(store.get_record("3").is_none());
        assert!(store.get_record("4").is_none());
    }

    #[test]
    fn test_preload_replaces_contents() {
        let store = RecordStore::with_records(vec![KeyedRecord::new("1", switch_on())]);
        store.preload(vec![KeyedRecord::new("2", switch_off())]);
        assert_eq!(store.len(), 1);
        assert!(store.get_record("1").is_none());
    }

    #[test]
    fn test_set_record_validation() {
        let store = RecordStore::new();
        assert_eq!(store.set_record("", switch_on()), Err(StoreError::EmptyId));
        assert_eq!(
            store.set_record("9", IssueFeatures::default()),
            Err(StoreError::EmptyRecord("9".into()))
        );
        assert!(store.is_empty());

        store.set_record("1", switch_on()).unwrap();
        assert_eq!(store.get_record("1"), Some(KeyedRecord::new("1", switch_on())));
    }

    #[test]
    fn test_set_record_rejects_records_without_text() {
        let posts = RecordStore::new();
        assert_eq!(
            posts.set_record("x", PostData::new("", "")),
            Err(StoreError::EmptyRecord("x".into()))
        );
        assert!(posts.is_empty());

        let issues = RecordStore::new();
        let blank = features(Some(""), None, None, None);
        assert_eq!(
            issues.set_record("y", blank),
            Err(StoreError::EmptyRecord("y".into()))
        );
        assert!(issues.is_empty());

        posts.set_record("z", PostData::new("", "body")).unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_preload_skips_records_without_text() {
        let posts = RecordStore::new();
        let kept = posts.preload(vec![
            KeyedRecord::new("a", PostData::new("", "")),
            KeyedRecord::new("b", PostData::new("title", "")),
        ]);
        assert_eq!(kept, 1);
        assert!(posts.get_record("a").is_none());

        let issues = RecordStore::new();
        let kept = issues.preload(vec![
            KeyedRecord::new("1", features(Some(""), Some(""), None, None)),
            KeyedRecord::new("2", switch_off()),
        ]);
        assert_eq!(kept, 1);
        assert!(issues.get_record("1").is_none());
        assert!(issues.get_record("2").is_some());
    }

    #[test]
    fn test_remove_record() {
        let store = RecordStore::new();
        store.set_record("1", switch_on()).unwrap();
        store.set_record("2", switch_off()).unwrap();

        assert!(store.remove_record("1"));
        assert!(store.get_record("1").is_none());
        assert!(!store.remove_record("3"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_in_id_order() {
        let store = RecordStore::new();
        store.set_record("b", switch_off()).unwrap();
        store.set_record("a", switch_on()).unwrap();
        let ids: Vec<_> = store.snapshot().into_iter().map(|k| k.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_find_similar() {
        let store = RecordStore::new();
        store.set_record("1", switch_on()).unwrap();
        store.set_record("2", switch_off()).unwrap();

        let query = features(
            Some("Turn on the switch"),
            None,
            Some("The device turns on"),
            Some("The device does not turn on"),
        );
        let result = store.find_similar(&query, &RankOptions::default()).unwrap();

        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].candidate.id, "1");
        assert_eq!(result.matches[0].candidate.record, switch_on());
        assert!(result.matches[0].score > 0.8);
    }

    #[test]
    fn test_find_similar_invalid_query() {
        let store = RecordStore::new();
        store.set_record("1", switch_on()).unwrap();
        let err = store
            .find_similar(&IssueFeatures::default(), &RankOptions::default())
            .unwrap_err();
        assert_eq!(err, RankError::InvalidQuery);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let store: RecordStore<IssueFeatures> = RecordStore::new();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        store.set_record(format!("{t}-{i}"), switch_on()).unwrap();
                        let _ = store.find_similar(&switch_on(), &RankOptions::new(1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 100);
    }

    #[tokio::test]
    async fn test_find_similar_async() {
        let store = RecordStore::new();
        store.set_record("1", switch_on()).unwrap();
        store.set_record("2", switch_off()).unwrap();

        let result = store
            .find_similar_async(switch_off(), RankOptions::new(5).with_parallelism(2))
            .await
            .unwrap();
        assert_eq!(result.matches[0].candidate.id, "2");
        assert!((result.matches[0].score - 1.0).abs() < 1e-9);
    }
}
