use super::schema::{FieldKind, FieldRule, Schema};
use crate::errors::ApiError;
use bson::Bson;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// Drop payload fields the schema doesn't know about. Internal stamps
/// (`_id`, `createdAt`, `_rev`) are schema-less on purpose and get
/// stripped here too; the store re-stamps them itself.
pub fn strip_unknown(schema: &Schema, doc: &mut bson::Document) {
    let keep: Vec<String> =
        doc.keys().filter(|k| schema.rule(k).is_some()).cloned().collect();
    let mut out = bson::Document::new();
    for k in keep {
        if let Some(v) = doc.get(&k) {
            out.insert(k, v.clone());
        }
    }
    *doc = out;
}

pub fn apply_defaults(schema: &Schema, doc: &mut bson::Document) {
    for (name, value) in schema.defaults {
        if !doc.contains_key(name) {
            doc.insert((*name).to_string(), value.to_bson());
        }
    }
}

/// Validate `touched` against the schema, collecting every violation
/// rather than stopping at the first. `full` is the document as it would
/// be after the write; cross-field invariants are checked against it.
///
/// # Errors
/// `ValidationFailed` carrying all violated constraints.
pub fn validate(
    schema: &Schema,
    touched: &bson::Document,
    full: &bson::Document,
    mode: ValidationMode,
) -> Result<(), ApiError> {
    let mut violations = Vec::new();

    if mode == ValidationMode::Create {
        for rule in schema.fields.iter().filter(|r| r.required) {
            if !full.contains_key(rule.name) {
                violations.push(format!("field '{}' is required", rule.name));
            }
        }
    }

    for (name, value) in touched {
        let Some(rule) = schema.rule(name) else {
            continue;
        };
        if mode == ValidationMode::Update && rule.immutable {
            violations.push(format!("field '{name}' is immutable"));
            continue;
        }
        check_field(rule, value, &mut violations);
    }

    for check in schema.cross_checks {
        if let Some(msg) = check(full) {
            violations.push(msg);
        }
    }

    if violations.is_empty() { Ok(()) } else { Err(ApiError::ValidationFailed(violations)) }
}

fn check_field(rule: &FieldRule, value: &Bson, violations: &mut Vec<String>) {
    match rule.kind {
        FieldKind::Number => {
            let Some(n) = as_f64(value) else {
                violations.push(format!("field '{}' must be a number", rule.name));
                return;
            };
            if let Some(min) = rule.min
                && n < min
            {
                violations.push(format!("field '{}' must be at least {min}", rule.name));
            }
            if let Some(max) = rule.max
                && n > max
            {
                violations.push(format!("field '{}' must be at most {max}", rule.name));
            }
        }
        FieldKind::Bool => {
            if !matches!(value, Bson::Boolean(_)) {
                violations.push(format!("field '{}' must be a boolean", rule.name));
            }
        }
        FieldKind::Str | FieldKind::Reference => {
            let Bson::String(s) = value else {
                violations.push(format!("field '{}' must be a string", rule.name));
                return;
            };
            if let Some(min_len) = rule.min_len
                && s.chars().count() < min_len
            {
                violations
                    .push(format!("field '{}' must have at least {min_len} characters", rule.name));
            }
            if let Some(max_len) = rule.max_len
                && s.chars().count() > max_len
            {
                violations
                    .push(format!("field '{}' must have at most {max_len} characters", rule.name));
            }
            if !rule.one_of.is_empty() && !rule.one_of.contains(&s.as_str()) {
                violations.push(format!(
                    "field '{}' must be one of: {}",
                    rule.name,
                    rule.one_of.join(", ")
                ));
            }
        }
    }
}

pub(crate) fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}
