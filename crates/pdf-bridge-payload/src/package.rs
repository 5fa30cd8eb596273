//! Boundary packaging
//!
//! An inline payload is wrapped, together with the renderer bundle and the
//! host viewport width, into one standalone HTML document. The isolated
//! context reads two addressable values back at startup:
//!
//! * `#file[data-file]` - the encoded document payload
//! * `#sw[value]` - the viewport width captured at packaging time
//!
//! [`Handoff`] is the structured form of the same two values.

use crate::types::*;
use lol_html::{RewriteStrSettings, element, rewrite_str};
use std::sync::Arc;

pub const PAYLOAD_ELEMENT_ID: &str = "file";
pub const PAYLOAD_ATTRIBUTE: &str = "data-file";
pub const WIDTH_ELEMENT_ID: &str = "sw";
pub const WIDTH_ATTRIBUTE: &str = "value";
pub const MOUNT_ELEMENT_ID: &str = "react-container";

/// What the isolated context receives at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub payload: Arc<str>,
    pub viewport_width: u32,
}

impl Handoff {
    pub fn new(payload: impl Into<Arc<str>>, viewport_width: u32) -> Self {
        Self {
            payload: payload.into(),
            viewport_width,
        }
    }

    /// Read the handoff back out of a packaged HTML document
    pub fn from_html(html: &str) -> std::result::Result<Self, HandoffError> {
        let payload = read_attribute(html, PAYLOAD_ELEMENT_ID, PAYLOAD_ATTRIBUTE)?;
        let width = read_attribute(html, WIDTH_ELEMENT_ID, WIDTH_ATTRIBUTE)?;
        let viewport_width = width
            .trim()
            .parse::<u32>()
            .map_err(|_| HandoffError::InvalidWidth(width.clone()))?;

        Ok(Self::new(payload, viewport_width))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandoffError {
    #[error("Element #{0} not found in artifact")]
    MissingElement(String),
    #[error("Attribute '{attribute}' missing on #{element}")]
    MissingAttribute { element: String, attribute: String },
    #[error("Viewport width '{0}' is not a number")]
    InvalidWidth(String),
    #[error("Artifact is not readable HTML: {0}")]
    Malformed(String),
}

/// Immutable, self-executing bundle handed across the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedArtifact {
    handoff: Handoff,
    html: String,
}

impl PackagedArtifact {
    pub fn handoff(&self) -> &Handoff {
        &self.handoff
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

/// Builds [`PackagedArtifact`]s. Pure: equal inputs give equal artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryPackager;

impl BoundaryPackager {
    pub fn package(payload: &str, bundle: &str, viewport_width: u32) -> Result<PackagedArtifact> {
        if payload.is_empty() {
            return Err(BridgeError::Encoding("Cannot package an empty payload".to_string()));
        }

        let html = format!(
            r#"<!DOCTYPE html>
<html>
 <head>
   <title>PDF reader</title>
   <meta charset="utf-8" />
   <meta name="viewport" content="width=device-width, initial-scale=1.0" />
 </head>
 <body>
   <input type="hidden" id="{width_id}" {width_attr}="{width}" />
   <div id="{payload_id}" {payload_attr}="{payload}"></div>
   <div id="{mount_id}"></div>
   <script type="text/javascript">{bundle}</script>
 </body>
</html>
"#,
            width_id = WIDTH_ELEMENT_ID,
            width_attr = WIDTH_ATTRIBUTE,
            width = viewport_width,
            payload_id = PAYLOAD_ELEMENT_ID,
            payload_attr = PAYLOAD_ATTRIBUTE,
            payload = html_escape::encode_double_quoted_attribute(payload),
            mount_id = MOUNT_ELEMENT_ID,
            bundle = escape_script(bundle),
        );

        log::debug!(
            "Packaged artifact: {} byte payload, width {}, {} bytes total",
            payload.len(),
            viewport_width,
            html.len()
        );

        Ok(PackagedArtifact {
            handoff: Handoff::new(payload, viewport_width),
            html,
        })
    }
}

// A literal `</script` would close the inline script element early
fn escape_script(bundle: &str) -> String {
    bundle.replace("</script", "<\\/script")
}

/// Find `attribute` on the element whose id is `element_id`
fn read_attribute(
    html: &str,
    element_id: &str,
    attribute: &str,
) -> std::result::Result<String, HandoffError> {
    // `None` until the element is seen, then whatever the attribute holds
    let mut found: Option<Option<String>> = None;
    let selector = format!("#{}", element_id);

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(selector, |el| {
                if found.is_none() {
                    found = Some(el.get_attribute(attribute));
                }
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| HandoffError::Malformed(e.to_string()))?;

    match found {
        None => Err(HandoffError::MissingElement(element_id.to_string())),
        Some(None) => Err(HandoffError::MissingAttribute {
            element: element_id.to_string(),
            attribute: attribute.to_string(),
        }),
        Some(Some(value)) => Ok(html_escape::decode_html_entities(&value).into_owned()),
    }
}
