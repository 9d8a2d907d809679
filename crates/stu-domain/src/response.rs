//! Acknowledgment envelope sent back to the ground station.

use crate::error::IngestError;
use chrono::{DateTime, Utc};

const SCHEMA_LOCATION: &str = "http://cody.glpconnect.com/XSD/StuResponse_Rev1_0.xsd";
const DELIVERY_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S GMT";
const UNKNOWN_ID: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseState {
    Pass,
    Fail,
}

impl ResponseState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

/// Pass/fail acknowledgment for one batch request.
#[derive(Debug, Clone, PartialEq)]
pub struct StuResponse {
    state: ResponseState,
    state_message: String,
    message_id: Option<String>,
}

impl StuResponse {
    /// Acknowledge a processed batch. `stored` counts every inserted
    /// record, including those that carry a decoding error.
    pub fn pass(stored: usize, batch_id: Option<&str>) -> Self {
        Self {
            state: ResponseState::Pass,
            state_message: format!("{stored} messages received and stored successfully"),
            message_id: batch_id.map(str::to_owned),
        }
    }

    /// Reject a batch. The IDs are forced to `unknown` since a batch that
    /// failed may never have yielded one.
    pub fn fail(error: &IngestError) -> Self {
        Self {
            state: ResponseState::Fail,
            state_message: error.to_string(),
            message_id: None,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.state == ResponseState::Pass
    }

    /// Render the `stuResponseMsg` envelope.
    pub fn to_xml(&self, delivery_time: DateTime<Utc>) -> String {
        let message_id = self.message_id.as_deref().unwrap_or(UNKNOWN_ID);
        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<stuResponseMsg xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" ",
                "xsi:noNamespaceSchemaLocation=\"{schema}\" ",
                "deliveryTimeStamp=\"{delivery}\" messageID=\"{id}\" correlationID=\"{id}\">\n",
                "<state>{state}</state>\n",
                "<stateMessage>{message}</stateMessage>\n",
                "</stuResponseMsg>\n",
            ),
            schema = SCHEMA_LOCATION,
            delivery = delivery_time.format(DELIVERY_TIMESTAMP_FORMAT),
            id = xml_escape(message_id),
            state = self.state.as_str(),
            message = xml_escape(&self.state_message),
        )
    }
}

fn xml_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
