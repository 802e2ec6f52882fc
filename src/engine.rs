//! Composition root tying configuration, policy, lifecycle and persistence
//! together.

use crate::config::{ConfigProvider, SurveyConfig};
use crate::entity::{Entity, TypeRegistry, TypeSummary};
use crate::error::EngineError;
use crate::gateway::{Gateway, DEFAULT_STORE_TIMEOUT};
use crate::lifecycle::{ItemLifecycle, NEW_ITEM_SENTINEL};
use crate::models::{Answer, Question, Respondent, Survey};
use crate::notify::UpdateNotifier;
use crate::policy::FieldPolicy;
use crate::store::EntityStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Knobs that do not come from the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub store_timeout: Duration,
    pub sentinel_id: i64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
            sentinel_id: NEW_ITEM_SENTINEL,
        }
    }
}

#[derive(Debug)]
pub struct SurveyEngine {
    config: Arc<SurveyConfig>,
    registry: TypeRegistry,
    policy: FieldPolicy,
    lifecycle: ItemLifecycle,
    gateway: Gateway,
    notifier: UpdateNotifier,
}

impl SurveyEngine {
    #[must_use]
    pub fn new(
        config: Arc<SurveyConfig>,
        store: Arc<dyn EntityStore>,
        options: EngineOptions,
    ) -> Self {
        if let Some(default_id) = config.default_id {
            if default_id != options.sentinel_id {
                warn!(
                    default_id,
                    sentinel_id = options.sentinel_id,
                    "DefaultId in configuration is ignored; set sentinel_id instead"
                );
            }
        }

        let lifecycle = ItemLifecycle::new(options.sentinel_id);
        let notifier = UpdateNotifier::default();
        let gateway = Gateway::new(store, options.store_timeout, lifecycle, notifier.clone());
        info!(
            timeout_ms = options.store_timeout.as_millis(),
            sentinel_id = options.sentinel_id,
            "Survey engine ready"
        );
        Self {
            policy: FieldPolicy::new(Arc::clone(&config)),
            config,
            registry: TypeRegistry::new(),
            lifecycle,
            gateway,
            notifier,
        }
    }

    /// Build an engine from a provider, loading the configuration if needed.
    pub async fn from_provider(
        provider: &ConfigProvider,
        store: Arc<dyn EntityStore>,
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        let config = provider.get().await?;
        Ok(Self::new(config, store, options))
    }

    /// Validate `E` and record it in the registry.
    pub fn register<E: Entity>(&mut self) -> Result<&TypeSummary, EngineError> {
        self.registry.register::<E>()
    }

    /// Register the four survey record types.
    pub fn with_survey_models(mut self) -> Result<Self, EngineError> {
        self.register::<Survey>()?;
        self.register::<Question>()?;
        self.register::<Respondent>()?;
        self.register::<Answer>()?;
        Ok(self)
    }

    #[must_use]
    pub fn describe(&self, type_name: &str) -> Option<&TypeSummary> {
        self.registry.get(type_name)
    }

    #[must_use]
    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    #[must_use]
    pub fn lifecycle(&self) -> &ItemLifecycle {
        &self.lifecycle
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn notifier(&self) -> &UpdateNotifier {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::entity::fixtures::Slugged;
    use crate::store::MemoryStore;

    fn engine() -> SurveyEngine {
        SurveyEngine::new(
            Arc::new(SurveyConfig::default()),
            Arc::new(MemoryStore::new()),
            EngineOptions::default(),
        )
    }

    #[test]
    fn test_with_survey_models_registers_all_four() {
        let engine = engine().with_survey_models().unwrap();
        let names: Vec<_> = engine.registry().type_names().collect();
        assert_eq!(names, vec!["Answer", "Question", "Respondent", "Survey"]);

        let question = engine.describe("Question").unwrap();
        assert_eq!(question.display_name, Some("Text"));
        assert_eq!(question.identity.name, "Id");
        assert!(engine.describe("Note").is_none());
    }

    #[test]
    fn test_register_rejects_text_identity() {
        let mut engine = engine();
        assert!(matches!(
            engine.register::<Slugged>(),
            Err(EngineError::UnsupportedIdentityType { .. })
        ));
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_options_flow_into_components() {
        let options = EngineOptions {
            store_timeout: Duration::from_millis(250),
            sentinel_id: 0,
        };
        let engine = SurveyEngine::new(
            Arc::new(SurveyConfig::default()),
            Arc::new(MemoryStore::new()),
            options,
        );
        assert_eq!(engine.lifecycle().sentinel_id(), 0);
        assert_eq!(engine.gateway().timeout(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_from_provider_uses_loaded_config() {
        let config = parse_config(r#"{ "HiddenFields": [{ "Item": "all", "Fields": ["Id"] }] }"#)
            .unwrap();
        let provider = ConfigProvider::preloaded(config);
        let engine = SurveyEngine::from_provider(
            &provider,
            Arc::new(MemoryStore::new()),
            EngineOptions::default(),
        )
        .await
        .unwrap();
        assert!(engine.policy().is_hidden("Survey", "Id"));
        assert_eq!(engine.config().hidden_fields.len(), 1);
    }

    #[tokio::test]
    async fn test_gateway_events_reach_engine_notifier() {
        let engine = engine();
        let mut rx = engine.notifier().subscribe();
        let mut survey: Survey = engine.lifecycle().initialize().unwrap();
        engine.gateway().add(&mut survey).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().type_name, "Survey");
    }
}
