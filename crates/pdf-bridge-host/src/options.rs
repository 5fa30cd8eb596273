use crate::{HostError, Result};
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Host platform, captured once when the shell is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Platform {
    Ios,
    Android,
    Other,
}

impl Platform {
    /// Platform of the compile target
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Other
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Origins the embedding surface may navigate to by default
pub const DEFAULT_ORIGIN_WHITELIST: [&str; 4] = ["http://*", "https://*", "file://*", "data:*"];

/// Viewer configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewerOptions {
    pub platform: Platform,
    /// Origins the embedding surface is allowed to load
    pub origin_whitelist: Vec<String>,
    /// Renderer bundle script; an empty bundle is used when unset
    pub bundle: Option<PathBuf>,
    /// Fixed viewport width, used when no live viewport is attached
    pub viewport_width: Option<u32>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            origin_whitelist: DEFAULT_ORIGIN_WHITELIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
            bundle: None,
            viewport_width: None,
        }
    }
}

impl ViewerOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| HostError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| HostError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.origin_whitelist.is_empty() {
            return Err(HostError::Config(
                "Origin whitelist must not be empty".to_string(),
            ));
        }

        if self.viewport_width == Some(0) {
            return Err(HostError::Config(
                "Viewport width must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
