use super::*;
use crate::entity::fixtures::{Mislinked, Note, Orphan, Slugged, Tag};
use crate::models::{Answer, Question, Respondent, Survey};

#[test]
fn test_initialize_int_identity_uses_sentinel() {
    let lifecycle = ItemLifecycle::default();
    let survey: Survey = lifecycle.initialize().unwrap();
    assert_eq!(survey.id, NEW_ITEM_SENTINEL);
    assert_eq!(survey.name, "New Survey");
    assert!(lifecycle.is_new(&survey));
}

#[test]
fn test_initialize_sets_annotated_display_field() {
    let question: Question = ItemLifecycle::default().initialize().unwrap();
    assert_eq!(question.text, "New Question");
    assert!(question.description.is_empty());
}

#[test]
fn test_initialize_uuid_identity_is_fresh_and_new() {
    let lifecycle = ItemLifecycle::default();
    let first: Respondent = lifecycle.initialize().unwrap();
    let second: Respondent = lifecycle.initialize().unwrap();
    assert!(!first.id.is_nil());
    assert_ne!(first.id, second.id);
    assert_eq!(first.name, "New Respondent");
    assert!(lifecycle.is_new(&first));
}

#[test]
fn test_initialize_without_identity_fails() {
    let err = ItemLifecycle::default().initialize::<Orphan>().unwrap_err();
    assert!(matches!(err, EngineError::Metadata { .. }));
}

#[test]
fn test_initialize_unsupported_identity_fails() {
    let err = ItemLifecycle::default().initialize::<Slugged>().unwrap_err();
    assert!(matches!(
        err,
        EngineError::UnsupportedIdentityType { ref type_name, ref field, kind: FieldKind::Text }
            if type_name == "Slugged" && field == "Id"
    ));
}

#[test]
fn test_initialize_with_custom_sentinel() {
    let lifecycle = ItemLifecycle::new(0);
    let survey: Survey = lifecycle.initialize().unwrap();
    assert_eq!(survey.id, 0);
    assert!(lifecycle.is_new(&survey));
    assert!(!ItemLifecycle::default().is_new(&survey));
    assert_eq!(lifecycle.sentinel_id(), 0);
}

#[test]
fn test_is_new_false_for_persisted_ids() {
    let lifecycle = ItemLifecycle::default();
    let survey = Survey {
        id: 12,
        ..Survey::default()
    };
    assert!(!lifecycle.is_new(&survey));

    let respondent = Respondent {
        id: Uuid::now_v7(),
        ..Respondent::default()
    };
    assert!(!lifecycle.is_new(&respondent));
}

#[test]
fn test_is_new_for_nil_uuid() {
    assert!(ItemLifecycle::default().is_new(&Respondent::default()));
}

#[test]
fn test_is_new_for_text_identity() {
    let lifecycle = ItemLifecycle::default();
    assert!(lifecycle.is_new(&Slugged { id: "  ".to_string() }));
    assert!(lifecycle.is_new(&Slugged { id: "-1".to_string() }));
    assert!(!lifecycle.is_new(&Slugged { id: "intro".to_string() }));
}

#[test]
fn test_is_new_without_identity() {
    assert!(ItemLifecycle::default().is_new(&Orphan::default()));
}

#[test]
fn test_link_related_sets_reference_and_foreign_key() {
    let survey = Survey {
        id: 42,
        name: "Exit Interview".to_string(),
        ..Survey::default()
    };
    let mut question = Question::default();

    link_related(&mut question, &survey).unwrap();

    assert_eq!(question.survey_id, 42);
    assert_eq!(question.survey.as_ref(), Some(&survey));
}

#[test]
fn test_link_related_uuid_foreign_key() {
    let respondent = Respondent {
        id: Uuid::now_v7(),
        name: "Ada".to_string(),
        ..Respondent::default()
    };
    let mut answer = Answer::default();

    link_related(&mut answer, &respondent).unwrap();

    assert_eq!(answer.respondent_id, respondent.id);
    assert_eq!(answer.respondent.as_ref().map(|r| r.id), Some(respondent.id));
    assert!(answer.question.is_none());
}

#[test]
fn test_link_related_second_relation_on_same_parent() {
    let question = Question {
        id: 9,
        text: "Why?".to_string(),
        ..Question::default()
    };
    let mut answer = Answer::default();

    link_related(&mut answer, &question).unwrap();

    assert_eq!(answer.question_id, 9);
    assert_eq!(answer.question.as_ref().map(|q| q.id), Some(9));
}

#[test]
fn test_link_related_reference_only() {
    let tag = Tag {
        key: Uuid::now_v7(),
        code: "ops".to_string(),
        ..Tag::default()
    };
    let mut note = Note::default();

    link_related(&mut note, &tag).unwrap();

    assert_eq!(note.tag.as_ref(), Some(&tag));
    assert_eq!(note.id, 0);
}

#[test]
fn test_link_related_identity_kind_mismatch_is_fatal() {
    let note = Note {
        id: 5,
        ..Note::default()
    };
    let mut parent = Mislinked::default();

    let err = link_related(&mut parent, &note).unwrap_err();

    assert!(matches!(
        err,
        EngineError::TypeConversion { ref field, expected: FieldKind::Text, .. }
            if field == "NoteId"
    ));
    assert!(parent.note.is_some());
    assert!(parent.note_id.is_empty());
    assert_eq!(parent.id, 0);
}

#[test]
fn test_id_string() {
    let survey = Survey {
        id: 7,
        ..Survey::default()
    };
    assert_eq!(id_string(&survey), Some("7".to_string()));
    assert_eq!(id_string(&Orphan::default()), None);

    let respondent = Respondent::default();
    assert_eq!(id_string(&respondent), Some(Uuid::nil().to_string()));
}
