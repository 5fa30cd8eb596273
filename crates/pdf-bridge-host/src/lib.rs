mod alert;
mod options;
mod shell;
mod view;

pub use alert::{AlertSink, GENERIC_ALERT, INVALID_SOURCE_ALERT, LogAlerts};
pub use options::{DEFAULT_ORIGIN_WHITELIST, Platform, ViewerOptions};
pub use shell::{HostShell, ShellState};
pub use view::{
    DEFAULT_VIEWPORT_WIDTH, FixedViewport, HostView, Presentation, SurfaceConfig, Viewport,
};

use pdf_bridge_payload::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HostError>;
