//! Persistence-ready records.
//!
//! A record is assembled once per raw message and handed to the store
//! unchanged. Decode failures stay local to the record: they surface as a
//! `decoding_error` string and the record is stored anyway.

use crate::batch::{StuMessage, TelemetryBatch};
use crate::error::PayloadError;
use crate::payload::{decode_payload, DecodedPayload};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::warn;

/// Outcome of decoding one message's payload. The two cases are exclusive
/// by construction: a record either carries decoded fields or a decoding
/// error, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodeOutcome {
    Decoded { decoded: DecodedPayload },
    Failed { decoding_error: String },
}

/// One stored document: batch metadata, the raw message fields, the
/// normalized batch timestamp, and the decode outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StuRecord {
    pub batch_id: Option<String>,
    pub batch_timestamp: Option<String>,
    pub timestamp_adjusted: Option<NaiveDateTime>,
    pub esn: Option<String>,
    pub unix_time: Option<String>,
    pub gps: Option<String>,
    pub payload: Option<String>,
    pub payload_length: Option<String>,
    pub payload_source: Option<String>,
    pub payload_encoding: Option<String>,
    #[serde(flatten)]
    pub outcome: DecodeOutcome,
}

impl StuRecord {
    /// Assemble the record for one message. A missing payload and every
    /// splitter error end up as this record's `decoding_error`; nothing
    /// here can fail the batch.
    pub fn assemble(
        batch: &TelemetryBatch,
        message: &StuMessage,
        timestamp_adjusted: Option<NaiveDateTime>,
    ) -> Self {
        let outcome = match message.payload.as_deref() {
            Some(payload) => match decode_payload(payload) {
                Ok(decoded) => DecodeOutcome::Decoded { decoded },
                Err(error) => {
                    warn!(
                        esn = message.esn.as_deref().unwrap_or("unknown"),
                        %error,
                        "payload decode failed, storing record with error"
                    );
                    DecodeOutcome::Failed {
                        decoding_error: error.to_string(),
                    }
                }
            },
            None => DecodeOutcome::Failed {
                decoding_error: PayloadError::EmptyPayload.to_string(),
            },
        };

        Self {
            batch_id: batch.batch_id.clone(),
            batch_timestamp: batch.timestamp_raw.clone(),
            timestamp_adjusted,
            esn: message.esn.clone(),
            unix_time: message.unix_time.clone(),
            gps: message.gps.clone(),
            payload: message.payload.clone(),
            payload_length: message.payload_length.clone(),
            payload_source: message.payload_source.clone(),
            payload_encoding: message.payload_encoding.clone(),
            outcome,
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self.outcome, DecodeOutcome::Decoded { .. })
    }
}
