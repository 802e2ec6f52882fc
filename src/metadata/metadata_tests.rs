use super::*;
use crate::entity::fixtures::{Note, Orphan, Tag};
use crate::models::{Answer, Question, Respondent, Survey};
use chrono::NaiveDate;

fn spring_survey() -> Survey {
    Survey {
        id: 3,
        name: "Spring Survey".to_string(),
        description: "Quarterly pulse".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
    }
}

#[test]
fn test_identity_field_by_name() {
    let field = resolve_identity_field::<Survey>().unwrap();
    assert_eq!(field.name(), "Id");
    assert_eq!(field.kind(), FieldKind::Int);
}

#[test]
fn test_identity_field_by_flag() {
    let field = resolve_identity_field::<Tag>().unwrap();
    assert_eq!(field.name(), "Key");
}

#[test]
fn test_identity_field_missing_fails_loudly() {
    let err = resolve_identity_field::<Orphan>().unwrap_err();
    assert!(matches!(err, EngineError::Metadata { ref type_name } if type_name == "Orphan"));
}

#[test]
fn test_display_name_prefers_annotation_over_title() {
    let field = resolve_display_name_field::<Note>().unwrap();
    assert_eq!(field.name(), "Summary");
}

#[test]
fn test_display_name_prefers_annotation_over_name_heuristic() {
    assert_eq!(resolve_display_name_field::<Question>().unwrap().name(), "Text");
}

#[test]
fn test_display_name_name_heuristic() {
    assert_eq!(resolve_display_name_field::<Survey>().unwrap().name(), "Name");
    assert_eq!(resolve_display_name_field::<Respondent>().unwrap().name(), "Name");
}

#[test]
fn test_display_name_first_text_fallback() {
    assert_eq!(resolve_display_name_field::<Answer>().unwrap().name(), "Text");
    assert_eq!(resolve_display_name_field::<Tag>().unwrap().name(), "Code");
}

#[test]
fn test_display_name_none_without_text_fields() {
    assert!(resolve_display_name_field::<Orphan>().is_none());
    assert_eq!(display_name(&Orphan::default()), "");
}

#[test]
fn test_display_name_renders_value() {
    assert_eq!(display_name(&spring_survey()), "Spring Survey");
}

#[test]
fn test_field_value_formats_dates() {
    let survey = spring_survey();
    assert_eq!(
        field_value(&survey, "StartDate"),
        Some(FieldValue::Text("01-apr-24".to_string()))
    );
    assert_eq!(
        field_value(&survey, "Name"),
        Some(FieldValue::Text("Spring Survey".to_string()))
    );
    assert_eq!(field_value(&survey, "Id"), Some(FieldValue::Int(3)));
}

#[test]
fn test_field_value_unknown_field_is_none() {
    assert_eq!(field_value(&spring_survey(), "Budget"), None);
    assert_eq!(field_value(&spring_survey(), "name"), None);
}

#[test]
fn test_entity_id_reads_identity() {
    assert_eq!(entity_id(&spring_survey()).unwrap(), Some(EntityId::Int(3)));
    assert_eq!(entity_id(&Tag::default()).unwrap(), None);
    assert!(entity_id(&Orphan::default()).is_err());
}

#[test]
fn test_supported_identity_accepts_uuid() {
    assert_eq!(
        resolve_supported_identity::<Respondent>().unwrap().kind(),
        FieldKind::Uuid
    );
}
