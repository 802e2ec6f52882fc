use crate::entity::{Entity, EntityDescriptor, FieldDef, FieldKind, FieldValue};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use uuid::Uuid;

/// A person answering surveys, keyed by UUID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Respondent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

type Field = FieldDef<Respondent>;

static DESCRIPTOR: Lazy<EntityDescriptor<Respondent>> = Lazy::new(|| {
    EntityDescriptor::new(
        "Respondent",
        vec![
            Field::new(
                "Id",
                FieldKind::Uuid,
                |r| FieldValue::Uuid(r.id),
                |r, v| {
                    r.id = v.into_uuid()?;
                    Ok(())
                },
            ),
            Field::new(
                "Name",
                FieldKind::Text,
                |r| FieldValue::Text(r.name.clone()),
                |r, v| {
                    r.name = v.into_text()?;
                    Ok(())
                },
            ),
            Field::new(
                "Email",
                FieldKind::Text,
                |r| FieldValue::Text(r.email.clone()),
                |r, v| {
                    r.email = v.into_text()?;
                    Ok(())
                },
            )
            .required(),
            Field::new(
                "CreatedAt",
                FieldKind::DateTime,
                |r| FieldValue::DateTime(r.created_at),
                |r, v| {
                    r.created_at = v.into_date_time()?;
                    Ok(())
                },
            ),
        ],
    )
});

impl Entity for Respondent {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        &DESCRIPTOR
    }
}
