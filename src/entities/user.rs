use crate::resource::{DefaultValue, FieldKind, FieldRule, Schema};

pub const COLLECTION: &str = "users";

static FIELDS: [FieldRule; 5] = [
    FieldRule { required: true, ..FieldRule::new("name", FieldKind::Str) },
    FieldRule { required: true, ..FieldRule::new("email", FieldKind::Str) },
    FieldRule::new("photo", FieldKind::Str),
    FieldRule {
        one_of: &["user", "guide", "lead-guide", "admin"],
        ..FieldRule::new("role", FieldKind::Str)
    },
    FieldRule::new("active", FieldKind::Bool),
];

fn email_has_at_sign(doc: &bson::Document) -> Option<String> {
    let email = doc.get_str("email").ok()?;
    if email.contains('@') { None } else { Some(format!("'{email}' is not a valid email address")) }
}

static SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &FIELDS,
    unique: &[&["email"]],
    defaults: &[("role", DefaultValue::Str("user")), ("active", DefaultValue::Bool(true))],
    cross_checks: &[email_has_at_sign],
    // deactivated accounts stay out of listings
    hidden_when: Some(("active", false)),
};

#[must_use]
pub fn schema() -> &'static Schema {
    &SCHEMA
}
