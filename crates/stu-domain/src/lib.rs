//! Core pipeline for Globalstar STU telemetry batches: payload decoding,
//! batch parsing, record assembly, and the acknowledgment envelope.

mod batch;
mod error;
mod frame;
mod in_memory_record_store;
mod ingest;
mod payload;
mod record;
mod response;
mod store;
mod timestamp;

pub use batch::*;
pub use error::*;
pub use frame::*;
pub use in_memory_record_store::*;
pub use ingest::*;
pub use payload::*;
pub use record::*;
pub use response::*;
pub use store::*;
pub use timestamp::*;
