//! JSON file implementation of [`ScheduleStore`].

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use planner_app::ports::ScheduleStore;
use planner_domain::error::PlannerError;
use planner_domain::schedule::ScheduleConfig;

use crate::error::JsonStoreError;

/// Schedule stored as one JSON document on disk.
///
/// A missing file reads as an empty schedule. Writes go to a sibling
/// temporary file which is then renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFileScheduleStore {
    path: PathBuf,
}

impl JsonFileScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temporary_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read(&self) -> Result<ScheduleConfig, JsonStoreError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no schedule file yet");
                return Ok(ScheduleConfig::default());
            }
            Err(source) => {
                return Err(JsonStoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(ScheduleConfig::default());
        }

        serde_json::from_slice(&content).map_err(|source| JsonStoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, config: &ScheduleConfig) -> Result<(), JsonStoreError> {
        let content = serde_json::to_vec_pretty(config).map_err(JsonStoreError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| JsonStoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let temporary = self.temporary_path();
        tokio::fs::write(&temporary, &content)
            .await
            .map_err(|source| JsonStoreError::Io {
                path: temporary.clone(),
                source,
            })?;
        tokio::fs::rename(&temporary, &self.path)
            .await
            .map_err(|source| JsonStoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), bytes = content.len(), "schedule written");
        Ok(())
    }
}

impl ScheduleStore for JsonFileScheduleStore {
    fn get(&self) -> impl Future<Output = Result<ScheduleConfig, PlannerError>> + Send {
        async move { self.read().await.map_err(JsonStoreError::into_domain) }
    }

    fn put(&self, config: ScheduleConfig) -> impl Future<Output = Result<(), PlannerError>> + Send {
        async move { self.write(&config).await.map_err(JsonStoreError::into_domain) }
    }
}
