//! Batch ingestion: the per-message assemble/store loop.

use crate::batch::parse_batch;
use crate::error::IngestResult;
use crate::record::StuRecord;
use crate::store::RecordStore;
use crate::timestamp::normalize_timestamp;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// What a processed batch amounted to. A record that carries a
/// `decoding_error` still counts as stored. The batch id is echoed back to
/// the caller for the acknowledgment envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub stored: usize,
    pub batch_id: Option<String>,
}

/// Domain service that turns one batch envelope into stored records.
///
/// Messages are processed strictly in document order and each record is
/// inserted before the next message begins, so stored records keep a total
/// order per batch. Per-message decode failures are isolated into the
/// record; only a malformed batch or a store failure aborts the request.
pub struct BatchIngestService {
    store: Arc<dyn RecordStore>,
}

impl BatchIngestService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, doc))]
    pub async fn ingest(&self, doc: &roxmltree::Document<'_>) -> IngestResult<IngestSummary> {
        let batch = parse_batch(doc)?;
        // The timestamp is batch-scoped; normalize it once for every record
        let timestamp_adjusted = normalize_timestamp(batch.timestamp_raw.as_deref());

        debug!(
            batch_id = batch.batch_id.as_deref().unwrap_or("unknown"),
            message_count = batch.messages.len(),
            "processing batch"
        );

        let mut stored = 0;
        for message in &batch.messages {
            let record = StuRecord::assemble(&batch, message, timestamp_adjusted);
            self.store.insert(&record).await?;
            stored += 1;
        }

        info!(
            batch_id = batch.batch_id.as_deref().unwrap_or("unknown"),
            stored, "batch stored"
        );

        Ok(IngestSummary {
            stored,
            batch_id: batch.batch_id,
        })
    }
}
