use pdf_bridge_payload::*;
use std::collections::BTreeMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one canned HTTP response on 127.0.0.1 and hand back the raw request
async fn serve_once(status: &'static str, body: &'static [u8]) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/pdf\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(body).await.unwrap();
        socket.shutdown().await.unwrap();

        String::from_utf8_lossy(&request).to_lowercase()
    });

    (format!("http://{}/doc.pdf", addr), server)
}

fn transport() -> DefaultTransport {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    DefaultTransport::with_client(client)
}

fn headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Authorization".to_string(), "Bearer token".to_string());
    headers.insert("X-Trace".to_string(), "abc123".to_string());
    headers
}

#[tokio::test]
async fn test_http_headers_reach_the_wire() {
    let (uri, server) = serve_once("200 OK", b"%PDF-").await;
    let headers = headers();

    let body = transport()
        .fetch(FetchRequest {
            uri: &uri,
            headers: &headers,
        })
        .await
        .unwrap();

    assert_eq!(body.bytes, b"%PDF-");
    assert_eq!(body.content_type.as_deref(), Some("application/pdf"));

    let request = server.await.unwrap();
    assert!(request.starts_with("get /doc.pdf "));
    assert_eq!(request.matches("authorization: bearer token\r\n").count(), 1);
    assert_eq!(request.matches("x-trace: abc123\r\n").count(), 1);
}

#[tokio::test]
async fn test_http_error_status_is_fetch_error() {
    let (uri, server) = serve_once("404 Not Found", b"missing").await;
    let headers = headers();

    let result = transport()
        .fetch(FetchRequest {
            uri: &uri,
            headers: &headers,
        })
        .await;

    match result {
        Err(BridgeError::Fetch(msg)) => assert!(msg.contains("404")),
        other => panic!("Expected Fetch error, got {:?}", other),
    }
    assert!(server.await.unwrap().contains("x-trace: abc123"));
}
