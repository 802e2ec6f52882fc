use super::Survey;
use crate::entity::{Entity, EntityDescriptor, FieldDef, FieldKind, FieldValue, Related, Relation};
use once_cell::sync::Lazy;

/// A question belonging to a survey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub survey_id: i64,
    pub text: String,
    pub description: String,
    pub survey: Option<Survey>,
}

type Field = FieldDef<Question>;

static DESCRIPTOR: Lazy<EntityDescriptor<Question>> = Lazy::new(|| {
    EntityDescriptor::new(
        "Question",
        vec![
            Field::new(
                "Id",
                FieldKind::Int,
                |q| FieldValue::Int(q.id),
                |q, v| {
                    q.id = v.into_int()?;
                    Ok(())
                },
            ),
            Field::new(
                "SurveyId",
                FieldKind::Int,
                |q| FieldValue::Int(q.survey_id),
                |q, v| {
                    q.survey_id = v.into_int()?;
                    Ok(())
                },
            ),
            Field::new(
                "Text",
                FieldKind::Text,
                |q| FieldValue::Text(q.text.clone()),
                |q, v| {
                    q.text = v.into_text()?;
                    Ok(())
                },
            )
            .display_name()
            .required(),
            Field::new(
                "Description",
                FieldKind::Text,
                |q| FieldValue::Text(q.description.clone()),
                |q, v| {
                    q.description = v.into_text()?;
                    Ok(())
                },
            ),
        ],
    )
    .with_relation(Relation::new("Survey", "Survey", "SurveyId"))
});

impl Entity for Question {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        &DESCRIPTOR
    }
}

impl Related<Survey> for Question {
    fn set_related(&mut self, related: Survey) {
        self.survey = Some(related);
    }

    fn related(&self) -> Option<&Survey> {
        self.survey.as_ref()
    }
}
