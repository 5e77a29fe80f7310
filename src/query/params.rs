use crate::errors::ApiError;
use crate::types::CREATED_AT_FIELD;
use bson::Bson;
use std::collections::BTreeMap;

use super::types::{
    CmpOp, DEFAULT_LIMIT, DEFAULT_PAGE, Filter, MAX_LIMIT, MAX_PROJECTION_FIELDS, MAX_SORT_FIELDS,
    Order, Page, Projection, QuerySpec, SortSpec,
};

/// Parameter names consumed by the sort/projection/pagination stages and
/// excluded from the predicate.
const RESERVED: [&str; 4] = ["page", "sort", "limit", "fields"];

impl QuerySpec {
    /// Translate a flat set of query parameters into an immutable spec.
    ///
    /// Non-reserved parameters become equality constraints, or comparisons
    /// when the name carries a bracketed operator suffix
    /// (`price[gte]=500`). Conditions are collected into an ordered map
    /// keyed by (field, operator), so any ordering of the same parameters
    /// yields an equal predicate and a repeated pair keeps its last value.
    ///
    /// # Errors
    /// `InvalidQuery` on an unrecognized or malformed operator suffix, or
    /// on a deny-list entry inside the `fields` allow-list.
    pub fn from_params(params: &[(String, String)]) -> Result<Self, ApiError> {
        let mut conditions: BTreeMap<(String, CmpOp), Bson> = BTreeMap::new();
        let mut sort = None;
        let mut fields = None;
        let mut page = None;
        let mut limit = None;

        for (name, value) in params {
            match name.as_str() {
                "sort" => sort = Some(value.as_str()),
                "fields" => fields = Some(value.as_str()),
                "page" => page = Some(value.as_str()),
                "limit" => limit = Some(value.as_str()),
                _ => {
                    let (field, op) = parse_field_op(name)?;
                    if RESERVED.contains(&field.as_str()) {
                        continue;
                    }
                    conditions.insert((field, op), coerce_value(value));
                }
            }
        }

        let filter = if conditions.is_empty() {
            Filter::True
        } else {
            Filter::And(
                conditions
                    .into_iter()
                    .map(|((path, op), value)| Filter::Cmp { path, op, value })
                    .collect(),
            )
        };

        Ok(Self {
            filter,
            sort: parse_sort(sort),
            projection: parse_fields(fields)?,
            page: parse_page(page, limit),
        })
    }
}

/// Split `price[gte]` into `("price", Gte)`; a bare name is an equality.
fn parse_field_op(name: &str) -> Result<(String, CmpOp), ApiError> {
    let Some(open) = name.find('[') else {
        if name.contains(']') {
            return Err(ApiError::InvalidQuery(format!("malformed filter parameter '{name}'")));
        }
        return Ok((name.to_string(), CmpOp::Eq));
    };
    let field = &name[..open];
    let rest = &name[open + 1..];
    let Some(inner) = rest.strip_suffix(']') else {
        return Err(ApiError::InvalidQuery(format!("malformed filter parameter '{name}'")));
    };
    if field.is_empty() || inner.contains('[') || inner.contains(']') {
        return Err(ApiError::InvalidQuery(format!("malformed filter parameter '{name}'")));
    }
    let op = match inner {
        "gte" => CmpOp::Gte,
        "gt" => CmpOp::Gt,
        "lte" => CmpOp::Lte,
        "lt" => CmpOp::Lt,
        other => {
            return Err(ApiError::InvalidQuery(format!(
                "unrecognized filter operator '{other}' on field '{field}'"
            )));
        }
    };
    Ok((field.to_string(), op))
}

/// Query-string values are untyped; try integer, float and bool before
/// falling back to a string so numeric comparisons behave.
fn coerce_value(raw: &str) -> Bson {
    if let Ok(i) = raw.parse::<i64>() {
        return Bson::Int64(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Bson::Double(f);
    }
    match raw {
        "true" => Bson::Boolean(true),
        "false" => Bson::Boolean(false),
        _ => Bson::String(raw.to_string()),
    }
}

fn parse_sort(raw: Option<&str>) -> Vec<SortSpec> {
    let keys: Vec<SortSpec> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "-")
        .take(MAX_SORT_FIELDS)
        .map(|key| match key.strip_prefix('-') {
            Some(field) => SortSpec { field: field.to_string(), order: Order::Desc },
            None => SortSpec { field: key.to_string(), order: Order::Asc },
        })
        .collect();
    if keys.is_empty() {
        // newest first when the request doesn't say otherwise
        vec![SortSpec { field: CREATED_AT_FIELD.to_string(), order: Order::Desc }]
    } else {
        keys
    }
}

fn parse_fields(raw: Option<&str>) -> Result<Projection, ApiError> {
    let Some(raw) = raw else {
        return Ok(Projection::Default);
    };
    let mut include = Vec::new();
    for f in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if f.starts_with('-') {
            return Err(ApiError::InvalidQuery(format!(
                "projection '{f}' mixes exclusion into an allow-list"
            )));
        }
        if include.len() < MAX_PROJECTION_FIELDS {
            include.push(f.to_string());
        }
    }
    if include.is_empty() { Ok(Projection::Default) } else { Ok(Projection::Include(include)) }
}

/// Absent, unparsable, zero or negative values clamp to the defaults.
fn parse_page(page: Option<&str>, limit: Option<&str>) -> Page {
    let parse_positive = |raw: Option<&str>, default: u64| {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map_or(default, |n| n as u64)
    };
    Page {
        page: parse_positive(page, DEFAULT_PAGE),
        limit: parse_positive(limit, DEFAULT_LIMIT).min(MAX_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn bare_param_is_equality() {
        let spec = QuerySpec::from_params(&pairs(&[("difficulty", "easy")])).unwrap();
        assert_eq!(
            spec.filter,
            Filter::And(vec![Filter::Cmp {
                path: "difficulty".into(),
                op: CmpOp::Eq,
                value: Bson::String("easy".into()),
            }])
        );
    }

    #[test]
    fn bracket_suffix_selects_operator_and_coerces_numbers() {
        let spec = QuerySpec::from_params(&pairs(&[("price[gte]", "500")])).unwrap();
        assert_eq!(
            spec.filter,
            Filter::And(vec![Filter::Cmp {
                path: "price".into(),
                op: CmpOp::Gte,
                value: Bson::Int64(500),
            }])
        );
    }

    #[test]
    fn unknown_operator_is_invalid_query() {
        let err = QuerySpec::from_params(&pairs(&[("price[within]", "500")])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuery(_)));
        let err = QuerySpec::from_params(&pairs(&[("price[gte", "500")])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuery(_)));
    }

    #[test]
    fn reserved_params_stay_out_of_the_predicate() {
        let spec = QuerySpec::from_params(&pairs(&[
            ("page", "2"),
            ("limit", "10"),
            ("sort", "-price,name"),
            ("fields", "name,price"),
        ]))
        .unwrap();
        assert_eq!(spec.filter, Filter::True);
        assert_eq!(spec.page, Page { page: 2, limit: 10 });
        assert_eq!(
            spec.sort,
            vec![
                SortSpec { field: "price".into(), order: Order::Desc },
                SortSpec { field: "name".into(), order: Order::Asc },
            ]
        );
        assert_eq!(spec.projection, Projection::Include(vec!["name".into(), "price".into()]));
    }

    #[test]
    fn parameter_order_does_not_change_the_predicate() {
        let a = QuerySpec::from_params(&pairs(&[
            ("price[gte]", "100"),
            ("price[lte]", "500"),
            ("difficulty", "easy"),
        ]))
        .unwrap();
        let b = QuerySpec::from_params(&pairs(&[
            ("difficulty", "easy"),
            ("price[lte]", "500"),
            ("price[gte]", "100"),
        ]))
        .unwrap();
        assert_eq!(a.filter, b.filter);
    }

    #[test]
    fn pagination_clamps_to_defaults() {
        let spec = QuerySpec::from_params(&pairs(&[("page", "0"), ("limit", "-5")])).unwrap();
        assert_eq!(spec.page, Page::default());
        let spec = QuerySpec::from_params(&pairs(&[("page", "x")])).unwrap();
        assert_eq!(spec.page.page, DEFAULT_PAGE);
    }

    #[test]
    fn default_sort_is_newest_first() {
        let spec = QuerySpec::from_params(&[]).unwrap();
        assert_eq!(spec.sort, vec![SortSpec { field: "createdAt".into(), order: Order::Desc }]);
    }

    #[test]
    fn deny_entry_in_allow_list_is_rejected() {
        let err = QuerySpec::from_params(&pairs(&[("fields", "name,-price")])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuery(_)));
    }
}
