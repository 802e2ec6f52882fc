//! Unusual entity shapes shared by unit tests.

use super::{Entity, EntityDescriptor, FieldDef, FieldKind, FieldValue, Related, Relation};
use once_cell::sync::Lazy;
use uuid::Uuid;

/// Annotated `Summary` field declared after a `Title` text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub tag: Option<Tag>,
}

static NOTE: Lazy<EntityDescriptor<Note>> = Lazy::new(|| {
    EntityDescriptor::new(
        "Note",
        vec![
            FieldDef::<Note>::new(
                "Id",
                FieldKind::Int,
                |n| FieldValue::Int(n.id),
                |n, v| {
                    n.id = v.into_int()?;
                    Ok(())
                },
            ),
            FieldDef::<Note>::new(
                "Title",
                FieldKind::Text,
                |n| FieldValue::Text(n.title.clone()),
                |n, v| {
                    n.title = v.into_text()?;
                    Ok(())
                },
            ),
            FieldDef::<Note>::new(
                "Summary",
                FieldKind::Text,
                |n| FieldValue::Text(n.summary.clone()),
                |n, v| {
                    n.summary = v.into_text()?;
                    Ok(())
                },
            )
            .display_name(),
        ],
    )
    .with_relation(Relation::reference_only("Tag", "Tag"))
});

impl Entity for Note {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        &NOTE
    }
}

impl Related<Tag> for Note {
    fn set_related(&mut self, related: Tag) {
        self.tag = Some(related);
    }

    fn related(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }
}

/// UUID identity flagged on a field not named `Id`; no text field carries
/// "name", so `Code` is the display fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub key: Uuid,
    pub weight: i64,
    pub code: String,
    pub label: String,
}

static TAG: Lazy<EntityDescriptor<Tag>> = Lazy::new(|| {
    EntityDescriptor::new(
        "Tag",
        vec![
            FieldDef::<Tag>::new(
                "Key",
                FieldKind::Uuid,
                |t| FieldValue::Uuid(t.key),
                |t, v| {
                    t.key = v.into_uuid()?;
                    Ok(())
                },
            )
            .identity(),
            FieldDef::<Tag>::new(
                "Weight",
                FieldKind::Int,
                |t| FieldValue::Int(t.weight),
                |t, v| {
                    t.weight = v.into_int()?;
                    Ok(())
                },
            ),
            FieldDef::<Tag>::new(
                "Code",
                FieldKind::Text,
                |t| FieldValue::Text(t.code.clone()),
                |t, v| {
                    t.code = v.into_text()?;
                    Ok(())
                },
            ),
            FieldDef::<Tag>::new(
                "Label",
                FieldKind::Text,
                |t| FieldValue::Text(t.label.clone()),
                |t, v| {
                    t.label = v.into_text()?;
                    Ok(())
                },
            ),
        ],
    )
});

impl Entity for Tag {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        &TAG
    }
}

/// No identity field at all.
#[derive(Debug, Clone, Default)]
pub struct Orphan {
    pub count: i64,
}

static ORPHAN: Lazy<EntityDescriptor<Orphan>> = Lazy::new(|| {
    EntityDescriptor::new(
        "Orphan",
        vec![FieldDef::<Orphan>::new(
            "Count",
            FieldKind::Int,
            |o| FieldValue::Int(o.count),
            |o, v| {
                o.count = v.into_int()?;
                Ok(())
            },
        )],
    )
});

impl Entity for Orphan {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        &ORPHAN
    }
}

/// Text identity, which cannot carry a sentinel.
#[derive(Debug, Clone, Default)]
pub struct Slugged {
    pub id: String,
}

static SLUGGED: Lazy<EntityDescriptor<Slugged>> = Lazy::new(|| {
    EntityDescriptor::new(
        "Slugged",
        vec![FieldDef::<Slugged>::new(
            "Id",
            FieldKind::Text,
            |s| FieldValue::Text(s.id.clone()),
            |s, v| {
                s.id = v.into_text()?;
                Ok(())
            },
        )],
    )
});

impl Entity for Slugged {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        &SLUGGED
    }
}

/// Foreign key declared with a kind that cannot hold the related identity.
#[derive(Debug, Clone, Default)]
pub struct Mislinked {
    pub id: i64,
    pub note_id: String,
    pub note: Option<Note>,
}

static MISLINKED: Lazy<EntityDescriptor<Mislinked>> = Lazy::new(|| {
    EntityDescriptor::new(
        "Mislinked",
        vec![
            FieldDef::<Mislinked>::new(
                "Id",
                FieldKind::Int,
                |m| FieldValue::Int(m.id),
                |m, v| {
                    m.id = v.into_int()?;
                    Ok(())
                },
            ),
            FieldDef::<Mislinked>::new(
                "NoteId",
                FieldKind::Text,
                |m| FieldValue::Text(m.note_id.clone()),
                |m, v| {
                    m.note_id = v.into_text()?;
                    Ok(())
                },
            ),
        ],
    )
    .with_relation(Relation::new("Note", "Note", "NoteId"))
});

impl Entity for Mislinked {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        &MISLINKED
    }
}

impl Related<Note> for Mislinked {
    fn set_related(&mut self, related: Note) {
        self.note = Some(related);
    }

    fn related(&self) -> Option<&Note> {
        self.note.as_ref()
    }
}
