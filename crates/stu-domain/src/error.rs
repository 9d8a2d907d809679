use thiserror::Error;

/// Failures scoped to a single message's payload. These never abort the
/// batch; the record assembler converts them into the record's
/// `decoding_error` field.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid hex: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("payload is empty")]
    EmptyPayload,

    #[error("payload length {actual} is not a positive multiple of the 9-byte frame size")]
    InvalidPayloadLength { actual: usize },
}

pub type PayloadResult<T> = std::result::Result<T, PayloadError>;

/// Failures fatal to the whole batch. Both cases surface to the caller as a
/// fail acknowledgment carrying the error description.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed batch: {0}")]
    MalformedBatch(String),

    #[error("record store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type IngestResult<T> = std::result::Result<T, IngestError>;
