use crate::descriptor::{SourceDescriptor, SourceRoute};
use crate::transport::{FetchRequest, FetchedBody, Transport};
use crate::types::*;
use base64::{Engine as _, engine::general_purpose};

/// Media type assumed when the transport does not report one
pub const DEFAULT_MEDIA_TYPE: &str = "application/pdf";

/// A payload ready to cross the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedPayload {
    /// Direct URI, loaded natively by the embedding surface
    Uri(String),
    /// Self-contained `data:` URI that still needs packaging
    Inline(String),
}

impl EncodedPayload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            EncodedPayload::Uri(_) => PayloadKind::Uri,
            EncodedPayload::Inline(_) => PayloadKind::Html,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EncodedPayload::Uri(s) | EncodedPayload::Inline(s) => s,
        }
    }
}

/// Turns a [`SourceDescriptor`] into a single transportable string
pub struct PayloadEncoder<T> {
    transport: T,
}

impl<T: Transport> PayloadEncoder<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn encode(&self, source: &SourceDescriptor) -> Result<EncodedPayload> {
        match source.route()? {
            SourceRoute::DirectUri(uri) => Ok(EncodedPayload::Uri(uri.to_string())),
            SourceRoute::Inline(reference) => {
                let body = self
                    .transport
                    .fetch(FetchRequest {
                        uri: reference,
                        headers: &source.headers,
                    })
                    .await?;
                log::debug!("Fetched {} bytes for inline payload", body.bytes.len());
                encode_data_url(&body).map(EncodedPayload::Inline)
            }
        }
    }
}

/// Convert a fetched body into a `data:<mime>;base64,<body>` string
pub fn encode_data_url(body: &FetchedBody) -> Result<String> {
    if body.bytes.is_empty() {
        return Err(BridgeError::Encoding("Fetched document is empty".to_string()));
    }

    let media_type = match body.content_type.as_deref() {
        Some(ct) => essence(ct)?,
        None => DEFAULT_MEDIA_TYPE,
    };

    let encoded = general_purpose::STANDARD.encode(&body.bytes);
    Ok(format!("data:{};base64,{}", media_type, encoded))
}

/// Strip parameters from a content type and check it is `type/subtype`
fn essence(content_type: &str) -> Result<&str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let valid = essence
        .split_once('/')
        .is_some_and(|(ty, sub)| is_token(ty) && is_token(sub));

    if valid {
        Ok(essence)
    } else {
        Err(BridgeError::Encoding(format!(
            "Unusable content type '{}'",
            content_type
        )))
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$&-^_.+".contains(&b))
}
