use crate::types::*;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// URI schemes the embedding surface can load without packaging
pub const DIRECT_SCHEMES: [&str; 4] = ["http://", "https://", "file://", "content://"];

/// Prefix marking an inline, self-describing payload
pub const INLINE_PREFIX: &str = "data:";

/// Where a document comes from, as supplied by the caller at mount time
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SourceDescriptor {
    /// Remote or local URI reference
    pub uri: Option<String>,
    /// Inline encoded payload (a `data:` URI)
    pub base64: Option<String>,
    /// Transport headers applied verbatim to the retrieval request
    pub headers: BTreeMap<String, String>,
}

/// The validated route a descriptor takes through the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRoute<'a> {
    DirectUri(&'a str),
    Inline(&'a str),
}

impl SourceRoute<'_> {
    pub fn kind(&self) -> PayloadKind {
        match self {
            SourceRoute::DirectUri(_) => PayloadKind::Uri,
            SourceRoute::Inline(_) => PayloadKind::Html,
        }
    }
}

impl SourceDescriptor {
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Default::default()
        }
    }

    pub fn from_base64(data: impl Into<String>) -> Self {
        Self {
            base64: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Parse a descriptor from its JSON form
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| BridgeError::InvalidSource(format!("Malformed descriptor: {}", e)))
    }

    /// Decide which payload form this descriptor carries.
    ///
    /// Exactly one of `uri` / `base64` must be recognized; a descriptor where
    /// both are recognized is ambiguous and rejected.
    pub fn route(&self) -> Result<SourceRoute<'_>> {
        let direct = self.uri.as_deref().filter(|uri| is_direct_uri(uri));
        let inline = self.base64.as_deref().filter(|data| is_inline_payload(data));

        match (direct, inline) {
            (Some(uri), None) => Ok(SourceRoute::DirectUri(uri)),
            (None, Some(data)) => Ok(SourceRoute::Inline(data)),
            (Some(_), Some(_)) => Err(BridgeError::InvalidSource(
                "Both uri and base64 are set; exactly one is allowed".to_string(),
            )),
            (None, None) => Err(BridgeError::InvalidSource(
                "Expected a uri with an http, file or content scheme, or a base64 data URI"
                    .to_string(),
            )),
        }
    }
}

/// Whether `uri` starts with a scheme the embedding surface loads natively
pub fn is_direct_uri(uri: &str) -> bool {
    DIRECT_SCHEMES.iter().any(|scheme| has_prefix_ignore_case(uri, scheme))
}

/// Whether `data` is an embedded, self-describing payload
pub fn is_inline_payload(data: &str) -> bool {
    has_prefix_ignore_case(data, INLINE_PREFIX) && data.contains(',')
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
