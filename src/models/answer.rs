use super::{Question, Respondent};
use crate::entity::{Entity, EntityDescriptor, FieldDef, FieldKind, FieldValue, Related, Relation};
use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use uuid::Uuid;

/// One respondent's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub id: i64,
    pub respondent_id: Uuid,
    pub question_id: i64,
    pub text: String,
    pub last_modified: NaiveDateTime,
    pub respondent: Option<Respondent>,
    pub question: Option<Question>,
}

impl Default for Answer {
    fn default() -> Self {
        Self {
            id: 0,
            respondent_id: Uuid::nil(),
            question_id: 0,
            text: String::new(),
            last_modified: Local::now().naive_local(),
            respondent: None,
            question: None,
        }
    }
}

type Field = FieldDef<Answer>;

static DESCRIPTOR: Lazy<EntityDescriptor<Answer>> = Lazy::new(|| {
    EntityDescriptor::new(
        "Answer",
        vec![
            Field::new(
                "Id",
                FieldKind::Int,
                |a| FieldValue::Int(a.id),
                |a, v| {
                    a.id = v.into_int()?;
                    Ok(())
                },
            ),
            Field::new(
                "RespondentId",
                FieldKind::Uuid,
                |a| FieldValue::Uuid(a.respondent_id),
                |a, v| {
                    a.respondent_id = v.into_uuid()?;
                    Ok(())
                },
            ),
            Field::new(
                "QuestionId",
                FieldKind::Int,
                |a| FieldValue::Int(a.question_id),
                |a, v| {
                    a.question_id = v.into_int()?;
                    Ok(())
                },
            ),
            Field::new(
                "Text",
                FieldKind::Text,
                |a| FieldValue::Text(a.text.clone()),
                |a, v| {
                    a.text = v.into_text()?;
                    Ok(())
                },
            ),
            Field::new(
                "LastModified",
                FieldKind::DateTime,
                |a| FieldValue::DateTime(a.last_modified),
                |a, v| {
                    a.last_modified = v.into_date_time()?;
                    Ok(())
                },
            ),
        ],
    )
    .with_relation(Relation::new("Respondent", "Respondent", "RespondentId"))
    .with_relation(Relation::new("Question", "Question", "QuestionId"))
});

impl Entity for Answer {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        &DESCRIPTOR
    }
}

impl Related<Respondent> for Answer {
    fn set_related(&mut self, related: Respondent) {
        self.respondent = Some(related);
    }

    fn related(&self) -> Option<&Respondent> {
        self.respondent.as_ref()
    }
}

impl Related<Question> for Answer {
    fn set_related(&mut self, related: Question) {
        self.question = Some(related);
    }

    fn related(&self) -> Option<&Question> {
        self.question.as_ref()
    }
}
