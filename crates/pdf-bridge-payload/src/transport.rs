//! Byte retrieval for inline payloads
//!
//! The encoder never talks to the network directly; it hands a
//! [`FetchRequest`] to a [`Transport`] and receives the raw body back.

use crate::descriptor::INLINE_PREFIX;
use crate::types::*;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use std::collections::BTreeMap;
use std::future::Future;
use url::Url;

/// A single retrieval request
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    pub uri: &'a str,
    pub headers: &'a BTreeMap<String, String>,
}

/// Body returned by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedBody {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// External collaborator that retrieves the bytes behind a reference
pub trait Transport: Send + Sync {
    fn fetch(&self, request: FetchRequest<'_>) -> impl Future<Output = Result<FetchedBody>> + Send;
}

/// Transport handling `data:`, `file://` and `http(s)://` references
#[derive(Debug, Clone, Default)]
pub struct DefaultTransport {
    client: reqwest::Client,
}

impl DefaultTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_http(&self, request: FetchRequest<'_>) -> Result<FetchedBody> {
        let mut builder = self.client.get(request.uri);
        for (name, value) in request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Fetch(format!(
                "{} returned HTTP {}",
                request.uri, status
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response.bytes().await?.to_vec();

        Ok(FetchedBody {
            content_type,
            bytes,
        })
    }
}

impl Transport for DefaultTransport {
    async fn fetch(&self, request: FetchRequest<'_>) -> Result<FetchedBody> {
        let url = Url::parse(request.uri)
            .map_err(|e| BridgeError::Fetch(format!("Unparseable reference: {}", e)))?;

        log::debug!("Fetching {} payload", url.scheme());

        match url.scheme() {
            "data" => decode_data_uri(request.uri),
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| BridgeError::Fetch(format!("Invalid file path for {}", url)))?;
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| BridgeError::Fetch(format!("{}: {}", path.display(), e)))?;
                Ok(FetchedBody {
                    content_type: None,
                    bytes,
                })
            }
            "http" | "https" => self.fetch_http(request).await,
            scheme => Err(BridgeError::Fetch(format!(
                "Unsupported transport scheme '{}'",
                scheme
            ))),
        }
    }
}

/// Forgiving base64: padding optional, trailing bits ignored
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a `data:[<mediatype>][;base64],<data>` URI into its body
pub fn decode_data_uri(uri: &str) -> Result<FetchedBody> {
    let rest = match uri.split_at_checked(INLINE_PREFIX.len()) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(INLINE_PREFIX) => rest,
        _ => return Err(BridgeError::Fetch("Not a data URI".to_string())),
    };
    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| BridgeError::Fetch("Data URI has no ',' separator".to_string()))?;

    let (media_type, is_base64) = match meta.strip_suffix(";base64") {
        Some(media_type) => (media_type, true),
        None => (meta, false),
    };

    let bytes = if is_base64 {
        let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        FORGIVING
            .decode(compact.as_bytes())
            .map_err(|e| BridgeError::Fetch(format!("Invalid base64 body: {}", e)))?
    } else {
        urlencoding::decode_binary(data.as_bytes()).into_owned()
    };

    let content_type = if media_type.is_empty() {
        None
    } else {
        Some(media_type.to_string())
    };

    Ok(FetchedBody {
        content_type,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_data_uri() {
        let body = decode_data_uri("data:application/pdf;base64,JVBERi0=").unwrap();
        assert_eq!(body.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(body.bytes, b"%PDF-");
    }

    #[test]
    fn decodes_percent_encoded_data_uri() {
        let body = decode_data_uri("data:,hello%20world").unwrap();
        assert_eq!(body.content_type, None);
        assert_eq!(body.bytes, b"hello world");
    }

    #[test]
    fn decodes_unpadded_base64() {
        let body = decode_data_uri("data:application/pdf;base64,JVBERi0").unwrap();
        assert_eq!(body.bytes, b"%PDF-");
    }

    #[test]
    fn rejects_bad_base64() {
        let result = decode_data_uri("data:application/pdf;base64,***");
        assert!(matches!(result, Err(BridgeError::Fetch(_))));
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(decode_data_uri("data:application/pdf;base64").is_err());
    }
}
