use crate::error::IngestResult;
use crate::record::StuRecord;
use async_trait::async_trait;

/// Insert-only record sink.
///
/// Implementations should:
/// - Persist one record per call, in submission order
/// - Return an error when the write fails; the pipeline treats that as
///   fatal for the rest of the batch
///
/// No query interface is required.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, record: &StuRecord) -> IngestResult<()>;
}
