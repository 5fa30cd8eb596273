use pdf_bridge_payload::*;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Transport double that records requests and replays a canned body
struct RecordingTransport {
    response: Option<FetchedBody>,
    requests: Mutex<Vec<(String, BTreeMap<String, String>)>>,
}

impl RecordingTransport {
    fn replying(body: FetchedBody) -> Self {
        Self {
            response: Some(body),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            response: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for RecordingTransport {
    async fn fetch(&self, request: FetchRequest<'_>) -> Result<FetchedBody> {
        self.requests
            .lock()
            .unwrap()
            .push((request.uri.to_string(), request.headers.clone()));
        self.response
            .clone()
            .ok_or_else(|| BridgeError::Fetch("HTTP 404 Not Found".to_string()))
    }
}

fn pdf_body() -> FetchedBody {
    FetchedBody {
        content_type: Some("application/pdf".to_string()),
        bytes: b"%PDF-".to_vec(),
    }
}

#[tokio::test]
async fn test_direct_uri_is_passed_through_without_fetch() {
    let encoder = PayloadEncoder::new(RecordingTransport::replying(pdf_body()));
    let source = SourceDescriptor::from_uri("https://x/doc.pdf");

    let payload = encoder.encode(&source).await.unwrap();

    assert_eq!(payload, EncodedPayload::Uri("https://x/doc.pdf".to_string()));
    assert_eq!(payload.kind(), PayloadKind::Uri);
    assert_eq!(encoder.transport().request_count(), 0);
}

#[tokio::test]
async fn test_inline_payload_is_fetched_and_encoded() {
    let encoder = PayloadEncoder::new(RecordingTransport::replying(pdf_body()));
    let source = SourceDescriptor::from_base64("data:application/pdf;base64,AAA=");

    let payload = encoder.encode(&source).await.unwrap();

    assert_eq!(
        payload,
        EncodedPayload::Inline("data:application/pdf;base64,JVBERi0=".to_string())
    );
    assert_eq!(encoder.transport().request_count(), 1);
}

#[tokio::test]
async fn test_headers_are_attached_verbatim() {
    let encoder = PayloadEncoder::new(RecordingTransport::replying(pdf_body()));
    let source = SourceDescriptor::from_base64("data:application/pdf;base64,AAA=")
        .with_header("Authorization", "Bearer abc")
        .with_header("X-Trace", "1");

    encoder.encode(&source).await.unwrap();

    let requests = encoder.transport().requests.lock().unwrap();
    let (uri, headers) = &requests[0];
    assert_eq!(uri, "data:application/pdf;base64,AAA=");
    assert_eq!(headers.len(), 2);
    assert_eq!(headers["Authorization"], "Bearer abc");
    assert_eq!(headers["X-Trace"], "1");
}

#[tokio::test]
async fn test_transport_failure_is_fetch_error() {
    let encoder = PayloadEncoder::new(RecordingTransport::failing());
    let source = SourceDescriptor::from_base64("data:application/pdf;base64,AAA=");

    let result = encoder.encode(&source).await;
    assert!(matches!(result, Err(BridgeError::Fetch(_))));
}

#[tokio::test]
async fn test_empty_body_is_encoding_error() {
    let encoder = PayloadEncoder::new(RecordingTransport::replying(FetchedBody {
        content_type: Some("application/pdf".to_string()),
        bytes: Vec::new(),
    }));
    let source = SourceDescriptor::from_base64("data:application/pdf;base64,");

    let result = encoder.encode(&source).await;
    assert!(matches!(result, Err(BridgeError::Encoding(_))));
}

#[tokio::test]
async fn test_invalid_source_skips_transport() {
    let encoder = PayloadEncoder::new(RecordingTransport::replying(pdf_body()));

    let result = encoder.encode(&SourceDescriptor::default()).await;

    assert!(matches!(result, Err(BridgeError::InvalidSource(_))));
    assert_eq!(encoder.transport().request_count(), 0);
}

#[tokio::test]
async fn test_default_transport_decodes_data_uri_locally() {
    let encoder = PayloadEncoder::new(DefaultTransport::new());
    let source = SourceDescriptor::from_base64("data:application/pdf;base64,JVBERi0=");

    let payload = encoder.encode(&source).await.unwrap();
    assert_eq!(payload.as_str(), "data:application/pdf;base64,JVBERi0=");
}

#[tokio::test]
async fn test_default_transport_reads_file_uri() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"%PDF-").unwrap();
    let uri = format!("file://{}", file.path().display());

    let body = DefaultTransport::new()
        .fetch(FetchRequest {
            uri: &uri,
            headers: &BTreeMap::new(),
        })
        .await
        .unwrap();

    assert_eq!(body.bytes, b"%PDF-");
    assert_eq!(encode_data_url(&body).unwrap(), "data:application/pdf;base64,JVBERi0=");
}

#[tokio::test]
async fn test_unpadded_base64_payload_is_accepted() {
    let encoder = PayloadEncoder::new(DefaultTransport::new());
    let source = SourceDescriptor::from_base64("data:application/pdf;base64,JVBERi0");

    let payload = encoder.encode(&source).await.unwrap();
    assert_eq!(payload.as_str(), "data:application/pdf;base64,JVBERi0=");
}

#[tokio::test]
async fn test_default_transport_decodes_file_uri_paths() {
    use tempfile::TempDir;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("my doc.pdf");
    tokio::fs::write(&path, b"%PDF-").await.unwrap();
    let escaped = path.display().to_string().replace(' ', "%20");

    for uri in [
        format!("file://{}", escaped),
        format!("file://localhost{}", escaped),
    ] {
        let body = DefaultTransport::new()
            .fetch(FetchRequest {
                uri: &uri,
                headers: &BTreeMap::new(),
            })
            .await
            .unwrap();
        assert_eq!(body.bytes, b"%PDF-", "reading {}", uri);
    }
}

#[tokio::test]
async fn test_default_transport_rejects_unknown_scheme() {
    let result = DefaultTransport::new()
        .fetch(FetchRequest {
            uri: "ftp://x/doc.pdf",
            headers: &BTreeMap::new(),
        })
        .await;
    assert!(matches!(result, Err(BridgeError::Fetch(_))));
}

#[test]
fn test_encode_uses_reported_media_type() {
    let body = FetchedBody {
        content_type: Some("application/octet-stream; charset=binary".to_string()),
        bytes: vec![1, 2, 3],
    };
    assert_eq!(
        encode_data_url(&body).unwrap(),
        "data:application/octet-stream;base64,AQID"
    );
}
