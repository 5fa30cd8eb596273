use crate::types::*;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Where the renderer bundle script comes from
#[derive(Debug, Clone, PartialEq)]
pub enum BundleSource {
    Inline(Arc<str>),
    File(PathBuf),
}

impl BundleSource {
    async fn load(&self) -> Result<Arc<str>> {
        match self {
            BundleSource::Inline(script) => Ok(script.clone()),
            BundleSource::File(path) => {
                let script = tokio::fs::read_to_string(path).await.map_err(|e| {
                    BridgeError::Bundle(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Ok(script.into())
            }
        }
    }
}

/// Renderer bundle loaded on first use and kept for the session
#[derive(Debug)]
pub struct LazyBundle {
    source: BundleSource,
    script: OnceCell<Arc<str>>,
}

impl LazyBundle {
    pub fn new(source: BundleSource) -> Self {
        Self {
            source,
            script: OnceCell::new(),
        }
    }

    pub fn inline(script: impl Into<Arc<str>>) -> Self {
        Self::new(BundleSource::Inline(script.into()))
    }

    /// Whether the bundle has been loaded yet
    pub fn is_loaded(&self) -> bool {
        self.script.initialized()
    }

    pub async fn get(&self) -> Result<Arc<str>> {
        let script = self
            .script
            .get_or_try_init(|| async {
                log::debug!("Loading renderer bundle");
                self.source.load().await
            })
            .await?;
        Ok(script.clone())
    }
}
