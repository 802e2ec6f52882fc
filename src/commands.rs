//! Command handlers, generic over the entity type named on the command line.

use color_eyre::eyre::{bail, eyre, Result};
use std::io::Write;
use survey_engine::{
    display_name, field_value, id_string, Entity, EngineError, FieldValue, SurveyEngine,
};
use tracing::debug;

/// Run `$body` with `$t` bound to the entity type registered as `$type_name`.
macro_rules! with_entity_type {
    ($type_name:expr, $t:ident => $body:expr) => {
        match $type_name {
            "Survey" => {
                type $t = survey_engine::Survey;
                $body
            }
            "Question" => {
                type $t = survey_engine::Question;
                $body
            }
            "Respondent" => {
                type $t = survey_engine::Respondent;
                $body
            }
            "Answer" => {
                type $t = survey_engine::Answer;
                $body
            }
            other => Err(color_eyre::eyre::eyre!("No command support for type {other}")),
        }
    };
}

pub(crate) use with_entity_type;

/// Match `raw` against the registered type names, ignoring case.
pub fn resolve_type(engine: &SurveyEngine, raw: &str) -> Result<&'static str> {
    engine
        .registry()
        .type_names()
        .find(|name| name.eq_ignore_ascii_case(raw))
        .ok_or_else(|| {
            let known: Vec<_> = engine.registry().type_names().collect();
            eyre!("Unknown type '{raw}'; registered types: {}", known.join(", "))
        })
}

/// Split `Field=Value`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .filter(|(field, _)| !field.is_empty())
        .ok_or_else(|| format!("expected Field=Value, got '{raw}'"))
}

pub fn describe<E: Entity, W: Write>(engine: &SurveyEngine, out: &mut W) -> Result<()> {
    let summary = engine
        .describe(E::type_name())
        .ok_or_else(|| EngineError::metadata(E::type_name()))?;
    writeln!(
        out,
        "{} (identity: {} {}, display: {})",
        summary.type_name,
        summary.identity.name,
        summary.identity.kind,
        summary.display_name.unwrap_or("-")
    )?;
    if let Some(fields) = engine.config().dropdown_fields.get(E::type_name()) {
        writeln!(out, "dropdown: {}", fields.join(" - "))?;
    }
    writeln!(
        out,
        "{:<16}{:<10}{:<8}{:<11}{}",
        "FIELD", "KIND", "HIDDEN", "READ-ONLY", "WIDTH"
    )?;
    for field in engine.policy().field_layout::<E>() {
        let width = field
            .width_px
            .map_or_else(|| "-".to_string(), |w| format!("{w}px"));
        writeln!(
            out,
            "{:<16}{:<10}{:<8}{:<11}{}",
            field.name,
            field.kind.to_string(),
            yes_no(field.hidden),
            yes_no(field.read_only),
            width
        )?;
    }
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// One line per item: identity, then the dropdown text when configured,
/// else the display name.
fn summary_line<E: Entity>(engine: &SurveyEngine, item: &E) -> Result<String> {
    let id = id_string(item).unwrap_or_default();
    let text = if engine.policy().has_dropdown::<E>() {
        engine.policy().compose_dropdown_display(item)?
    } else {
        display_name(item)
    };
    Ok(format!("{id}\t{text}"))
}

pub async fn list<E: Entity, W: Write>(engine: &SurveyEngine, out: &mut W) -> Result<()> {
    let items: Vec<E> = engine.gateway().list().await?;
    debug!(type_name = E::type_name(), count = items.len(), "Listing items");
    for item in &items {
        writeln!(out, "{}", summary_line(engine, item)?)?;
    }
    Ok(())
}

async fn fetch<E: Entity>(engine: &SurveyEngine, raw_id: &str) -> Result<E> {
    engine
        .gateway()
        .get_by_id::<E>(raw_id)
        .await?
        .ok_or_else(|| {
            EngineError::NotFound {
                type_name: E::type_name().to_string(),
                id: raw_id.to_string(),
            }
            .into()
        })
}

pub async fn show<E: Entity, W: Write>(
    engine: &SurveyEngine,
    raw_id: &str,
    out: &mut W,
) -> Result<()> {
    let item: E = fetch(engine, raw_id).await?;
    for field in E::descriptor().fields() {
        if engine.policy().is_hidden_field::<E>(field.name()) {
            continue;
        }
        let value = field_value(&item, field.name()).unwrap_or(FieldValue::Null);
        writeln!(out, "{:<16}{value}", field.name())?;
    }
    Ok(())
}

pub async fn create<E: Entity, W: Write>(
    engine: &SurveyEngine,
    assignments: &[(String, String)],
    out: &mut W,
) -> Result<()> {
    let mut item: E = engine.lifecycle().initialize()?;
    for (name, raw) in assignments {
        let field = E::descriptor()
            .fields()
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::unknown_field(E::type_name(), name.as_str()))?;
        if engine.policy().is_read_only_field::<E>(field.name()) {
            bail!("{}.{} is read-only", E::type_name(), field.name());
        }
        let value = FieldValue::parse(field.kind(), raw).map_err(|e| EngineError::TypeConversion {
            type_name: E::type_name().to_string(),
            field: field.name().to_string(),
            value: e.to_string(),
            expected: field.kind(),
        })?;
        field
            .set(&mut item, value)
            .map_err(|e| eyre!("Cannot set {}: {e}", field.name()))?;
    }

    let id = engine.gateway().add(&mut item).await?;
    writeln!(out, "{id}")?;
    Ok(())
}

pub async fn delete<E: Entity, W: Write>(
    engine: &SurveyEngine,
    raw_id: &str,
    out: &mut W,
) -> Result<()> {
    let item: E = fetch(engine, raw_id).await?;
    engine.gateway().delete(&item).await?;
    writeln!(out, "Deleted {} {raw_id}", E::type_name())?;
    Ok(())
}
