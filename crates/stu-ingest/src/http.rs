//! HTTP edge: receives the ground station's XML POST, drives the
//! ingestion pipeline, and renders the acknowledgment envelope.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use chrono::Utc;
use std::sync::Arc;
use stu_domain::{BatchIngestService, IngestError, StuResponse};
use tracing::{error, instrument};

pub fn router(service: Arc<BatchIngestService>) -> Router {
    Router::new()
        .route("/api/gpsApi", post(receive_stu_messages))
        .with_state(service)
}

#[instrument(skip(service, body), fields(body_len = body.len()))]
async fn receive_stu_messages(
    State(service): State<Arc<BatchIngestService>>,
    body: String,
) -> impl IntoResponse {
    let outcome = match roxmltree::Document::parse(&body) {
        Ok(doc) => service.ingest(&doc).await,
        Err(parse_error) => Err(IngestError::MalformedBatch(parse_error.to_string())),
    };

    let (status, response) = match outcome {
        Ok(summary) => (
            StatusCode::OK,
            StuResponse::pass(summary.stored, summary.batch_id.as_deref()),
        ),
        Err(ingest_error) => {
            error!(error = %ingest_error, "batch rejected");
            (StatusCode::BAD_REQUEST, StuResponse::fail(&ingest_error))
        }
    };

    (
        status,
        [(header::CONTENT_TYPE, "text/xml")],
        response.to_xml(Utc::now()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use stu_domain::InMemoryRecordStore;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<InMemoryRecordStore>) {
        let store = Arc::new(InMemoryRecordStore::new());
        let service = Arc::new(BatchIngestService::new(store.clone()));
        (router(service), store)
    }

    async fn post_body(app: Router, body: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/gpsApi")
                    .header(header::CONTENT_TYPE, "text/xml")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    const BATCH: &str = r#"<stuMessages messageID="M-900" timeStamp="09/10/2025 15:18:07 GMT">
<stuMessage><esn>0-1</esn><payload>0x04C5080DCC190A0000</payload></stuMessage>
<stuMessage><esn>0-2</esn><payload>0x04C5080DCC190A0000</payload></stuMessage>
</stuMessages>"#;

    #[tokio::test]
    async fn test_valid_batch_returns_pass() {
        let (app, store) = app();

        let (status, body) = post_body(app, BATCH).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<state>pass</state>"));
        assert!(body.contains("2 messages received and stored successfully"));
        assert!(body.contains(r#"messageID="M-900""#));
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn test_unparseable_body_returns_fail() {
        let (app, store) = app();

        let (status, body) = post_body(app, "this is not xml").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("<state>fail</state>"));
        assert!(body.contains(r#"messageID="unknown""#));
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_wrong_root_element_returns_fail() {
        let (app, store) = app();

        let (status, body) = post_body(app, "<somethingElse/>").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("malformed batch"));
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_batch_with_bad_payload_still_passes() {
        let (app, store) = app();
        let batch = r#"<stuMessages messageID="M-901">
<stuMessage><esn>0-9</esn><payload>garbage</payload></stuMessage>
</stuMessages>"#;

        let (status, body) = post_body(app, batch).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("1 messages received and stored successfully"));
        let records = store.records().await;
        assert!(!records[0].is_decoded());
    }
}
