//! Batch envelope parsing: XML tree in, ordered raw messages out.
//!
//! Tokenization happens at the transport edge; this module only walks the
//! already-parsed tree. Field and attribute names follow the
//! `stuMessages` envelope the ground station posts.

use crate::error::{IngestError, IngestResult};

pub const BATCH_ROOT: &str = "stuMessages";
pub const MESSAGE_ELEMENT: &str = "stuMessage";

/// One batch envelope: metadata plus raw messages in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryBatch {
    pub batch_id: Option<String>,
    pub timestamp_raw: Option<String>,
    pub messages: Vec<StuMessage>,
}

/// One raw device report, fields as transmitted. The payload qualifiers
/// are only present when the payload was sent as an attributed element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StuMessage {
    pub esn: Option<String>,
    pub unix_time: Option<String>,
    pub gps: Option<String>,
    pub payload: Option<String>,
    pub payload_length: Option<String>,
    pub payload_source: Option<String>,
    pub payload_encoding: Option<String>,
}

/// Parse a batch envelope out of a document tree.
///
/// Absent attributes and fields come through as `None`; zero, one, or many
/// `stuMessage` children all normalize to the same ordered list.
pub fn parse_batch(doc: &roxmltree::Document<'_>) -> IngestResult<TelemetryBatch> {
    let root = doc.root_element();
    if root.tag_name().name() != BATCH_ROOT {
        return Err(IngestError::MalformedBatch(format!(
            "expected <{BATCH_ROOT}> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let messages = root
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == MESSAGE_ELEMENT)
        .map(parse_message)
        .collect();

    Ok(TelemetryBatch {
        batch_id: root.attribute("messageID").map(str::to_owned),
        timestamp_raw: root.attribute("timeStamp").map(str::to_owned),
        messages,
    })
}

fn parse_message(node: roxmltree::Node<'_, '_>) -> StuMessage {
    let mut message = StuMessage::default();
    for child in node.children().filter(|node| node.is_element()) {
        match child.tag_name().name() {
            "esn" => message.esn = element_text(&child),
            "unixTime" => message.unix_time = element_text(&child),
            "gps" => message.gps = element_text(&child),
            "payload" => {
                message.payload = element_text(&child);
                message.payload_length = child.attribute("length").map(str::to_owned);
                message.payload_source = child.attribute("source").map(str::to_owned);
                message.payload_encoding = child.attribute("encoding").map(str::to_owned);
            }
            _ => {}
        }
    }
    message
}

fn element_text(node: &roxmltree::Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> IngestResult<TelemetryBatch> {
        let doc = roxmltree::Document::parse(xml).expect("well-formed test xml");
        parse_batch(&doc)
    }

    #[test]
    fn test_full_batch() {
        let batch = parse(
            r#"<stuMessages messageID="M-001" timeStamp="09/10/2025 15:18:07 GMT">
                 <stuMessage>
                   <esn>0-1234567</esn>
                   <unixTime>1760015887</unixTime>
                   <gps>N</gps>
                   <payload length="9" source="pc" encoding="hex">0x04C5080DCC190A0000</payload>
                 </stuMessage>
               </stuMessages>"#,
        )
        .unwrap();

        assert_eq!(batch.batch_id.as_deref(), Some("M-001"));
        assert_eq!(batch.timestamp_raw.as_deref(), Some("09/10/2025 15:18:07 GMT"));
        assert_eq!(batch.messages.len(), 1);

        let message = &batch.messages[0];
        assert_eq!(message.esn.as_deref(), Some("0-1234567"));
        assert_eq!(message.unix_time.as_deref(), Some("1760015887"));
        assert_eq!(message.gps.as_deref(), Some("N"));
        assert_eq!(message.payload.as_deref(), Some("0x04C5080DCC190A0000"));
        assert_eq!(message.payload_length.as_deref(), Some("9"));
        assert_eq!(message.payload_source.as_deref(), Some("pc"));
        assert_eq!(message.payload_encoding.as_deref(), Some("hex"));
    }

    #[test]
    fn test_bare_payload_without_attributes() {
        let batch = parse(
            r#"<stuMessages messageID="M-002">
                 <stuMessage><payload>04C5080DCC190A0000</payload></stuMessage>
               </stuMessages>"#,
        )
        .unwrap();

        let message = &batch.messages[0];
        assert_eq!(message.payload.as_deref(), Some("04C5080DCC190A0000"));
        assert_eq!(message.payload_length, None);
        assert_eq!(message.payload_source, None);
        assert_eq!(message.payload_encoding, None);
    }

    #[test]
    fn test_missing_metadata_is_none() {
        let batch = parse("<stuMessages><stuMessage/></stuMessages>").unwrap();
        assert_eq!(batch.batch_id, None);
        assert_eq!(batch.timestamp_raw, None);
        assert_eq!(batch.messages[0], StuMessage::default());
    }

    #[test]
    fn test_empty_batch() {
        let batch = parse(r#"<stuMessages messageID="M-003"/>"#).unwrap();
        assert!(batch.messages.is_empty());
    }

    #[test]
    fn test_messages_keep_document_order() {
        let batch = parse(
            r#"<stuMessages>
                 <stuMessage><esn>first</esn></stuMessage>
                 <stuMessage><esn>second</esn></stuMessage>
                 <stuMessage><esn>third</esn></stuMessage>
               </stuMessages>"#,
        )
        .unwrap();

        let esns: Vec<_> = batch
            .messages
            .iter()
            .map(|message| message.esn.as_deref().unwrap())
            .collect();
        assert_eq!(esns, ["first", "second", "third"]);
    }

    #[test]
    fn test_unexpected_root_is_malformed() {
        let result = parse("<somethingElse/>");
        assert!(matches!(result, Err(IngestError::MalformedBatch(_))));
    }

    #[test]
    fn test_unknown_children_are_ignored() {
        let batch = parse(
            r#"<stuMessages>
                 <stuMessage>
                   <esn>0-1</esn>
                   <extraField>noise</extraField>
                 </stuMessage>
                 <notAMessage/>
               </stuMessages>"#,
        )
        .unwrap();
        assert_eq!(batch.messages.len(), 1);
        assert_eq!(batch.messages[0].esn.as_deref(), Some("0-1"));
    }
}
