use crate::entity::{Entity, EntityDescriptor, FieldDef, FieldKind, FieldValue};
use chrono::NaiveDate;
use once_cell::sync::Lazy;

/// A survey campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survey {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Default for Survey {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            description: String::new(),
            start_date: NaiveDate::MIN,
            end_date: NaiveDate::MIN,
        }
    }
}

type Field = FieldDef<Survey>;

static DESCRIPTOR: Lazy<EntityDescriptor<Survey>> = Lazy::new(|| {
    EntityDescriptor::new(
        "Survey",
        vec![
            Field::new(
                "Id",
                FieldKind::Int,
                |s| FieldValue::Int(s.id),
                |s, v| {
                    s.id = v.into_int()?;
                    Ok(())
                },
            ),
            Field::new(
                "Name",
                FieldKind::Text,
                |s| FieldValue::Text(s.name.clone()),
                |s, v| {
                    s.name = v.into_text()?;
                    Ok(())
                },
            )
            .required(),
            Field::new(
                "Description",
                FieldKind::Text,
                |s| FieldValue::Text(s.description.clone()),
                |s, v| {
                    s.description = v.into_text()?;
                    Ok(())
                },
            ),
            Field::new(
                "StartDate",
                FieldKind::Date,
                |s| FieldValue::Date(s.start_date),
                |s, v| {
                    s.start_date = v.into_date()?;
                    Ok(())
                },
            ),
            Field::new(
                "EndDate",
                FieldKind::Date,
                |s| FieldValue::Date(s.end_date),
                |s, v| {
                    s.end_date = v.into_date()?;
                    Ok(())
                },
            ),
        ],
    )
});

impl Entity for Survey {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        &DESCRIPTOR
    }
}
