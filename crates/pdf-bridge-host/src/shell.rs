//! Host-side lifecycle
//!
//! `Initializing -> Resolving -> Ready | Failed`. Resolution happens once per
//! shell; a failed shell stays failed.
//!
//! [`HostShell::resolve`] borrows the shell mutably for its whole run, so
//! `Resolving` is only ever held inside that call. Callers see `Initializing`
//! before it and `Ready` or `Failed` after it; both `Initializing` and
//! `Resolving` render as [`HostView::Loader`].

use crate::alert::{AlertSink, GENERIC_ALERT, INVALID_SOURCE_ALERT, LogAlerts};
use crate::options::{Platform, ViewerOptions};
use crate::view::{
    DEFAULT_VIEWPORT_WIDTH, FixedViewport, HostView, Presentation, SurfaceConfig, Viewport,
};
use crate::Result;
use pdf_bridge_payload::{
    BoundaryPackager, BridgeError, BundleSource, EncodedPayload, LazyBundle, PayloadEncoder,
    SourceDescriptor, Transport,
};

#[derive(Debug)]
pub enum ShellState {
    Initializing,
    Resolving,
    Ready(Presentation),
    Failed(BridgeError),
}

impl ShellState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ShellState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ShellState::Failed(_))
    }

    pub fn presentation(&self) -> Option<&Presentation> {
        match self {
            ShellState::Ready(presentation) => Some(presentation),
            _ => None,
        }
    }
}

type ReadyCallback = Box<dyn FnOnce() + Send>;

/// Owns one document session on the calling side
pub struct HostShell<T> {
    source: SourceDescriptor,
    encoder: PayloadEncoder<T>,
    bundle: LazyBundle,
    viewport: Box<dyn Viewport>,
    alerts: Box<dyn AlertSink>,
    on_ready: Option<ReadyCallback>,
    platform: Platform,
    origin_whitelist: Vec<String>,
    state: ShellState,
}

impl<T: Transport> HostShell<T> {
    pub fn new(source: SourceDescriptor, transport: T, options: ViewerOptions) -> Result<Self> {
        options.validate()?;

        let bundle = match options.bundle {
            Some(path) => LazyBundle::new(BundleSource::File(path)),
            None => LazyBundle::inline(""),
        };
        let width = options.viewport_width.unwrap_or(DEFAULT_VIEWPORT_WIDTH);

        Ok(Self {
            source,
            encoder: PayloadEncoder::new(transport),
            bundle,
            viewport: Box::new(FixedViewport(width)),
            alerts: Box::new(LogAlerts),
            on_ready: None,
            platform: options.platform,
            origin_whitelist: options.origin_whitelist,
            state: ShellState::Initializing,
        })
    }

    pub fn with_bundle(mut self, bundle: LazyBundle) -> Self {
        self.bundle = bundle;
        self
    }

    /// Live viewport queried when the artifact is packaged
    pub fn with_viewport(mut self, viewport: impl Viewport + 'static) -> Self {
        self.viewport = Box::new(viewport);
        self
    }

    pub fn with_alerts(mut self, alerts: impl AlertSink + 'static) -> Self {
        self.alerts = Box::new(alerts);
        self
    }

    /// Called once, right before the shell becomes ready
    pub fn on_ready(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_ready = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn bundle(&self) -> &LazyBundle {
        &self.bundle
    }

    pub fn transport(&self) -> &T {
        self.encoder.transport()
    }

    /// Resolve the source into something the embedding surface can show.
    ///
    /// Returns the settled state. The shell stays in `Resolving` while the
    /// inline payload is fetched and packaged.
    pub async fn resolve(&mut self) -> &ShellState {
        if !matches!(self.state, ShellState::Initializing) {
            log::warn!("Source already resolved, ignoring");
            return &self.state;
        }

        self.state = ShellState::Resolving;
        log::debug!("Resolving PDF source");

        let resolved = prepare(
            &self.encoder,
            &self.source,
            &self.bundle,
            self.viewport.as_ref(),
        )
        .await;

        match resolved {
            Ok(presentation) => {
                if let Some(callback) = self.on_ready.take() {
                    callback();
                }
                log::info!("Viewer ready ({:?} presentation)", presentation.kind());
                self.state = ShellState::Ready(presentation);
            }
            Err(e) => {
                log::error!("Failed to resolve PDF source: {}", e);
                let message = if e.is_invalid_source() {
                    INVALID_SOURCE_ALERT
                } else {
                    GENERIC_ALERT
                };
                self.alerts.alert(message);
                self.state = ShellState::Failed(e);
            }
        }

        &self.state
    }

    pub fn view(&self) -> HostView {
        match &self.state {
            ShellState::Initializing | ShellState::Resolving => HostView::Loader,
            ShellState::Ready(presentation) => HostView::Surface(SurfaceConfig::new(
                presentation.clone(),
                self.origin_whitelist.clone(),
                self.platform,
            )),
            ShellState::Failed(_) => HostView::Blank,
        }
    }
}

async fn prepare<T: Transport>(
    encoder: &PayloadEncoder<T>,
    source: &SourceDescriptor,
    bundle: &LazyBundle,
    viewport: &dyn Viewport,
) -> std::result::Result<Presentation, BridgeError> {
    let presentation = match encoder.encode(source).await? {
        EncodedPayload::Uri(uri) => Presentation::Uri(uri),
        EncodedPayload::Inline(payload) => {
            let script = bundle.get().await?;
            let width = viewport.width();
            Presentation::Html(BoundaryPackager::package(&payload, &script, width)?)
        }
    };

    if presentation.source().is_empty() {
        return Err(BridgeError::InvalidSource("Resolved payload is empty".to_string()));
    }

    Ok(presentation)
}
