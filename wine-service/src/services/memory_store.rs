//! In-memory store for tests and local runs without a database.

use super::database::{StoreError, WineStore};
use crate::models::{FeedbackRecord, Record, WineRecord};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    wines: Mutex<Vec<WineRecord>>,
    feedback: Mutex<Vec<FeedbackRecord>>,
    next_id: AtomicU64,
    list_calls: AtomicUsize,
    failure: Mutex<Option<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wines(wines: Vec<WineRecord>) -> Self {
        let store = Self::new();
        *store.wines.lock().unwrap_or_else(|e| e.into_inner()) = wines;
        store
    }

    /// Make every following call fail with `error` as the store's payload.
    pub fn fail_with(&self, error: Value) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Number of `list_wines` calls so far, failed ones included.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn feedback(&self) -> Vec<FeedbackRecord> {
        self.feedback
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        match self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            Some(body) => Err(StoreError::Rejected { status: 400, body }),
            None => Ok(()),
        }
    }

    fn stamp(&self, mut record: Record) -> Record {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        record.insert("id".to_string(), json!(id));
        record
    }
}

#[async_trait]
impl WineStore for MemoryStore {
    async fn list_wines(&self) -> Result<Vec<WineRecord>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.wines.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn insert_wine(&self, wine: WineRecord) -> Result<Vec<WineRecord>, StoreError> {
        self.check()?;
        let row = self.stamp(wine);
        self.wines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(row.clone());
        Ok(vec![row])
    }

    async fn insert_feedback(
        &self,
        feedback: FeedbackRecord,
    ) -> Result<Vec<FeedbackRecord>, StoreError> {
        self.check()?;
        let row = self.stamp(feedback);
        self.feedback
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(row.clone());
        Ok(vec![row])
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check()
    }
}
