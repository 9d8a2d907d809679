//! Payload splitting: hex text in, one or more decoded frames out.
//!
//! A payload is the hex-encoded concatenation of one or more 9-byte frames.
//! Devices that buffered several samples between passes transmit them as a
//! single multipart payload, oldest frame first.

use crate::error::{PayloadError, PayloadResult};
use crate::frame::{decode_frame, DecodedFrame, FRAME_LEN};
use serde::Serialize;

/// Result of splitting one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedPayload {
    Single { frame: DecodedFrame },
    Multipart { frames: Vec<DecodedFrame> },
}

fn strip_hex_prefix(payload: &str) -> &str {
    payload
        .strip_prefix("0x")
        .or_else(|| payload.strip_prefix("0X"))
        .unwrap_or(payload)
}

/// Decode a hex payload into frames.
///
/// The byte length must be exactly [`FRAME_LEN`] (single frame) or a larger
/// multiple of it (multipart). Each chunk is frame-sized by construction,
/// so per-chunk decoding cannot fail once the length check passes.
pub fn decode_payload(payload: &str) -> PayloadResult<DecodedPayload> {
    let bytes = hex::decode(strip_hex_prefix(payload))?;

    match bytes.len() {
        0 => Err(PayloadError::EmptyPayload),
        FRAME_LEN => Ok(DecodedPayload::Single {
            frame: decode_frame(&bytes),
        }),
        len if len % FRAME_LEN == 0 => Ok(DecodedPayload::Multipart {
            frames: bytes.chunks_exact(FRAME_LEN).map(decode_frame).collect(),
        }),
        len => Err(PayloadError::InvalidPayloadLength { actual: len }),
    }
}
