use crate::resource::{DefaultValue, FieldKind, FieldRule, Schema};

pub const COLLECTION: &str = "bookings";

static FIELDS: [FieldRule; 4] = [
    FieldRule {
        required: true,
        references: Some(super::tour::COLLECTION),
        ..FieldRule::new("tour", FieldKind::Reference)
    },
    FieldRule {
        required: true,
        references: Some(super::user::COLLECTION),
        ..FieldRule::new("user", FieldKind::Reference)
    },
    FieldRule { required: true, min: Some(0.0), ..FieldRule::new("price", FieldKind::Number) },
    FieldRule::new("paid", FieldKind::Bool),
];

static SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &FIELDS,
    unique: &[],
    defaults: &[("paid", DefaultValue::Bool(true))],
    cross_checks: &[],
    hidden_when: None,
};

#[must_use]
pub fn schema() -> &'static Schema {
    &SCHEMA
}
