use super::{load_config, ConfigError, SurveyConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Loads the configuration document once and hands out shared snapshots.
///
/// Concurrent first callers wait on the same initialization; the document
/// is read and parsed exactly once on success. A failed load leaves the
/// cell empty so the error is reported to every caller that asks.
#[derive(Debug)]
pub struct ConfigProvider {
    path: Option<PathBuf>,
    cell: OnceCell<Arc<SurveyConfig>>,
}

impl ConfigProvider {
    /// Lazily load from `path` on first access.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            cell: OnceCell::new(),
        }
    }

    /// Serve an already parsed configuration.
    #[must_use]
    pub fn preloaded(config: SurveyConfig) -> Self {
        Self {
            path: None,
            cell: OnceCell::new_with(Some(Arc::new(config))),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// The cached configuration, loading it on first call.
    pub async fn get(&self) -> Result<Arc<SurveyConfig>, ConfigError> {
        self.cell
            .get_or_try_init(|| async {
                let path = self.path.as_deref().ok_or_else(|| ConfigError::IoError {
                    path: String::new(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "no configuration path set",
                    ),
                })?;
                let config = load_config(path).await?;
                info!(path = %path.display(), "Survey configuration loaded");
                Ok::<_, ConfigError>(Arc::new(config))
            })
            .await
            .cloned()
    }
}
