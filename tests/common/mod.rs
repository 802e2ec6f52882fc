//! Common test utilities

// Each test binary uses a subset of these helpers.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use survey_engine::{
    ConfigProvider, EngineOptions, EntityStore, JsonFileStore, MemoryStore, SurveyEngine,
};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// The sample configuration document shipped with the crate.
pub fn sample_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("survey-config.json")
}

/// Engine over `store` with the sample configuration and survey models.
pub async fn engine_with_store(
    store: Arc<dyn EntityStore>,
    options: EngineOptions,
) -> SurveyEngine {
    let provider = ConfigProvider::from_path(sample_config_path());
    SurveyEngine::from_provider(&provider, store, options)
        .await
        .expect("Failed to build engine")
        .with_survey_models()
        .expect("Failed to register survey models")
}

/// Engine backed by a fresh in-memory store.
pub async fn memory_engine() -> SurveyEngine {
    engine_with_store(Arc::new(MemoryStore::new()), EngineOptions::default()).await
}

/// Engine backed by a JSON file store rooted at `dir`.
pub async fn file_engine(dir: &Path) -> SurveyEngine {
    let store = JsonFileStore::open(dir)
        .await
        .expect("Failed to open file store");
    engine_with_store(Arc::new(store), EngineOptions::default()).await
}
