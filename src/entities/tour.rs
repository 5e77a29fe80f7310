use crate::resource::{DefaultValue, FieldKind, FieldRule, Schema, as_f64};

pub const COLLECTION: &str = "tours";
pub const RATINGS_AVERAGE_FIELD: &str = "ratingsAverage";
pub const RATINGS_QUANTITY_FIELD: &str = "ratingsQuantity";

static FIELDS: [FieldRule; 12] = [
    FieldRule {
        required: true,
        min_len: Some(10),
        max_len: Some(40),
        ..FieldRule::new("name", FieldKind::Str)
    },
    FieldRule { required: true, ..FieldRule::new("duration", FieldKind::Number) },
    FieldRule { required: true, ..FieldRule::new("maxGroupSize", FieldKind::Number) },
    FieldRule {
        required: true,
        one_of: &["easy", "medium", "difficult"],
        ..FieldRule::new("difficulty", FieldKind::Str)
    },
    FieldRule { required: true, ..FieldRule::new("price", FieldKind::Number) },
    FieldRule::new("priceDiscount", FieldKind::Number),
    FieldRule { required: true, ..FieldRule::new("summary", FieldKind::Str) },
    FieldRule::new("description", FieldKind::Str),
    FieldRule { required: true, ..FieldRule::new("imageCover", FieldKind::Str) },
    FieldRule {
        min: Some(1.0),
        max: Some(5.0),
        ..FieldRule::new(RATINGS_AVERAGE_FIELD, FieldKind::Number)
    },
    FieldRule { min: Some(0.0), ..FieldRule::new(RATINGS_QUANTITY_FIELD, FieldKind::Number) },
    FieldRule::new("secretTour", FieldKind::Bool),
];

fn discount_below_price(doc: &bson::Document) -> Option<String> {
    let discount = doc.get("priceDiscount").and_then(as_f64)?;
    let price = doc.get("price").and_then(as_f64)?;
    if discount >= price {
        Some(format!("discount price ({discount}) should be below the regular price"))
    } else {
        None
    }
}

static SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &FIELDS,
    unique: &[&["name"]],
    defaults: &[
        (RATINGS_AVERAGE_FIELD, DefaultValue::Double(4.5)),
        (RATINGS_QUANTITY_FIELD, DefaultValue::Int(0)),
        ("secretTour", DefaultValue::Bool(false)),
    ],
    cross_checks: &[discount_below_price],
    hidden_when: Some(("secretTour", true)),
};

#[must_use]
pub fn schema() -> &'static Schema {
    &SCHEMA
}
