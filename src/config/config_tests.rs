use super::*;
use std::sync::Arc;
use tempfile::TempDir;

const SAMPLE: &str = r#"{
    "HiddenFields": [
        { "Item": "all", "Fields": ["InternalNote"] },
        { "Item": "Survey", "Fields": ["Description"] }
    ],
    "ReadOnlyFields": [
        { "ItemTypeName": "all", "Fields": ["Id"] }
    ],
    "FieldSizes": [
        { "Item": "Survey", "Field": "Name", "Width": 240 },
        { "ItemTypeName": "Survey", "FieldName": "Name", "WidthPixels": 999 }
    ],
    "DropdownFields": {
        "Survey": ["Name", "StartDate"]
    },
    "DefaultId": -1
}"#;

#[test]
fn test_parse_config_reads_all_sections() {
    let config = parse_config(SAMPLE).unwrap();
    assert_eq!(config.hidden_fields.len(), 2);
    assert_eq!(config.read_only_fields.len(), 1);
    assert_eq!(config.field_sizes.len(), 2);
    assert_eq!(
        config.dropdown_fields.get("Survey"),
        Some(&vec!["Name".to_string(), "StartDate".to_string()])
    );
    assert_eq!(config.default_id, Some(-1));
}

#[test]
fn test_parse_config_accepts_long_key_aliases() {
    let config = parse_config(SAMPLE).unwrap();
    assert_eq!(config.read_only_fields[0].item, "all");
    assert_eq!(config.field_sizes[1].width, 999);
    assert_eq!(config.field_sizes[1].field, "Name");
}

#[test]
fn test_parse_config_missing_sections_default_empty() {
    let config = parse_config("{}").unwrap();
    assert_eq!(config, SurveyConfig::default());
    assert!(config.default_id.is_none());
}

#[test]
fn test_parse_config_malformed_fails() {
    assert!(matches!(
        parse_config(r#"{ "HiddenFields": "nope" }"#),
        Err(ConfigError::JsonError(_))
    ));
    assert!(parse_config("not json").is_err());
}

#[test]
fn test_field_rule_wildcard_and_case() {
    let rule = FieldRule {
        item: ALL_ITEMS.to_string(),
        fields: vec!["InternalNote".to_string()],
    };
    assert!(rule.matches("Survey", "InternalNote"));
    assert!(rule.matches("Question", "internalnote"));
    assert!(!rule.matches("Survey", "Name"));
}

#[test]
fn test_field_rule_type_name_is_exact() {
    let rule = FieldRule {
        item: "Survey".to_string(),
        fields: vec!["Description".to_string()],
    };
    assert!(rule.matches("Survey", "Description"));
    assert!(!rule.matches("survey", "Description"));
    assert!(!rule.matches("Question", "Description"));
}

#[test]
fn test_field_size_matches() {
    let size = FieldSize {
        item: "Survey".to_string(),
        field: "Name".to_string(),
        width: 120,
    };
    assert!(size.matches("Survey", "name"));
    assert!(!size.matches("Question", "Name"));
}

#[test]
fn test_config_serializes_pascal_case() {
    let config = parse_config(SAMPLE).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"HiddenFields\""));
    assert!(json.contains("\"DropdownFields\""));
    assert!(json.contains("\"Item\""));
}

#[tokio::test]
async fn test_load_config_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("survey-config.json");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = load_config(&path).await.unwrap();
    assert_eq!(config.hidden_fields.len(), 2);
}

#[tokio::test]
async fn test_load_config_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let err = load_config(&temp.path().join("absent.json")).await.unwrap_err();
    assert!(matches!(err, ConfigError::IoError { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[tokio::test]
async fn test_provider_loads_once() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("survey-config.json");
    std::fs::write(&path, SAMPLE).unwrap();

    let provider = ConfigProvider::from_path(&path);
    assert!(!provider.is_loaded());
    let first = provider.get().await.unwrap();

    // Later edits are not picked up: the document is read once.
    std::fs::write(&path, "{}").unwrap();
    let second = provider.get().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.hidden_fields.len(), 2);
    assert!(provider.is_loaded());
}

#[tokio::test]
async fn test_provider_concurrent_first_access_shares_instance() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("survey-config.json");
    std::fs::write(&path, SAMPLE).unwrap();

    let provider = Arc::new(ConfigProvider::from_path(&path));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.get().await.unwrap() })
        })
        .collect();

    let mut loaded = Vec::new();
    for handle in handles {
        loaded.push(handle.await.unwrap());
    }
    let first = loaded.first().unwrap();
    assert!(loaded.iter().all(|c| Arc::ptr_eq(c, first)));
}

#[tokio::test]
async fn test_provider_malformed_document_errors() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("survey-config.json");
    std::fs::write(&path, "{ broken").unwrap();

    let provider = ConfigProvider::from_path(&path);
    assert!(matches!(provider.get().await, Err(ConfigError::JsonError(_))));
    assert!(!provider.is_loaded());
}

#[tokio::test]
async fn test_provider_preloaded() {
    let provider = ConfigProvider::preloaded(parse_config(SAMPLE).unwrap());
    assert!(provider.is_loaded());
    assert!(provider.path().is_none());
    assert_eq!(provider.get().await.unwrap().field_sizes.len(), 2);
}
