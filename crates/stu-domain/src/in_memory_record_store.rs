use crate::error::IngestResult;
use crate::record::StuRecord;
use crate::store::RecordStore;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-memory implementation of RecordStore using a Vec
///
/// Keeps records in insertion order. Used by tests and as the default sink
/// when no external document store is wired in.
pub struct InMemoryRecordStore {
    records: RwLock<Vec<StuRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn records(&self) -> Vec<StuRecord> {
        let records = self.records.read().await;
        records.clone()
    }

    pub async fn count(&self) -> usize {
        let records = self.records.read().await;
        records.len()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, record: &StuRecord) -> IngestResult<()> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(())
    }
}
