use crate::options::Platform;
use pdf_bridge_payload::{PackagedArtifact, PayloadKind};

/// Source of the host viewport width
pub trait Viewport: Send + Sync {
    fn width(&self) -> u32;
}

/// Width used when neither options nor a live viewport provide one
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 360;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedViewport(pub u32);

impl Viewport for FixedViewport {
    fn width(&self) -> u32 {
        self.0
    }
}

/// What the embedding surface is given to show, bound to the path this
/// session's descriptor resolved through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Uri(String),
    Html(PackagedArtifact),
}

impl Presentation {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Presentation::Uri(_) => PayloadKind::Uri,
            Presentation::Html(_) => PayloadKind::Html,
        }
    }

    /// The string handed to the embedding surface
    pub fn source(&self) -> &str {
        match self {
            Presentation::Uri(uri) => uri,
            Presentation::Html(artifact) => artifact.html(),
        }
    }
}

/// Configuration of the embedding surface once the shell is ready
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub presentation: Presentation,
    pub origin_whitelist: Vec<String>,
    /// `Some(false)` disables automatic page-fit scaling
    pub scales_page_to_fit: Option<bool>,
}

impl SurfaceConfig {
    pub fn new(presentation: Presentation, origin_whitelist: Vec<String>, platform: Platform) -> Self {
        let scales_page_to_fit = match platform {
            Platform::Android => Some(false),
            Platform::Ios | Platform::Other => None,
        };

        Self {
            presentation,
            origin_whitelist,
            scales_page_to_fit,
        }
    }
}

/// What the host shell renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostView {
    /// Loading indicator, shown until the shell is ready
    Loader,
    Surface(SurfaceConfig),
    /// Nothing, after a fatal error
    Blank,
}
