// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod logging;
pub mod metadata;
pub mod models;
pub mod notify;
pub mod policy;
pub mod settings;
pub mod store;

// Re-export commonly used types
pub use config::{load_config, parse_config, ConfigError, ConfigProvider, SurveyConfig};
pub use engine::{EngineOptions, SurveyEngine};
pub use entity::{
    format_date, Entity, EntityDescriptor, EntityId, FieldDef, FieldKind, FieldValue, Related,
    Relation, TypeRegistry, TypeSummary,
};
pub use error::EngineError;
pub use gateway::{schema_for, Gateway, DEFAULT_STORE_TIMEOUT};
pub use lifecycle::{id_string, link_related, ItemLifecycle, NEW_ITEM_SENTINEL};
pub use metadata::{
    display_name, entity_id, field_value, resolve_display_name_field, resolve_identity_field,
};
pub use models::{Answer, Question, Respondent, Survey};
pub use notify::{ItemEvent, ItemEventKind, UpdateNotifier};
pub use policy::{FieldLayout, FieldPolicy, DROPDOWN_SEPARATOR};
pub use settings::{load_settings, EngineSettings, SettingsError};
pub use store::{
    CommitReceipt, EntityStore, JsonFileStore, MemoryStore, Record, StoreError, StoreSession,
    TableSchema,
};
