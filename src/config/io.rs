use super::{ConfigError, SurveyConfig};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Read and parse the configuration document at `path`.
pub async fn load_config(path: &Path) -> Result<SurveyConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;
    let config = parse_config(&content)?;
    debug!(
        path = %path.display(),
        hidden_rules = config.hidden_fields.len(),
        read_only_rules = config.read_only_fields.len(),
        field_sizes = config.field_sizes.len(),
        dropdown_types = config.dropdown_fields.len(),
        "Loaded survey configuration"
    );
    Ok(config)
}

/// Parse a configuration document.
///
/// Duplicate `FieldSizes` entries are accepted; the first one wins and the
/// rest are reported.
pub fn parse_config(content: &str) -> Result<SurveyConfig, ConfigError> {
    let config: SurveyConfig = serde_json::from_str(content)?;

    let mut seen = HashSet::new();
    for size in &config.field_sizes {
        let key = (size.item.as_str(), size.field.to_ascii_lowercase());
        if !seen.insert(key) {
            warn!(
                item = %size.item,
                field = %size.field,
                "Duplicate FieldSizes entry ignored; the first match wins"
            );
        }
    }

    if let Some(default_id) = config.default_id {
        debug!(default_id, "DefaultId present in configuration");
    }

    Ok(config)
}
