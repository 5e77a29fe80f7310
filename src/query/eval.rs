use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::types::{CmpOp, Filter, MAX_PATH_DEPTH, MAX_SORT_FIELDS, Projection, SortSpec};
use crate::types::{ID_FIELD, REVISION_FIELD};

pub fn eval_filter(doc: &BsonDocument, filter: &Filter) -> bool {
    match filter {
        Filter::True => true,
        Filter::And(fs) => fs.iter().all(|f| eval_filter(doc, f)),
        Filter::Not(f) => !eval_filter(doc, f),
        Filter::Cmp { path, op, value } => {
            if let Some(v) = get_path(doc, path) {
                match op {
                    CmpOp::Eq => compare_bson(v, value) == Ordering::Equal,
                    CmpOp::Gt => compare_bson(v, value) == Ordering::Greater,
                    CmpOp::Gte => compare_bson(v, value) != Ordering::Less,
                    CmpOp::Lt => compare_bson(v, value) == Ordering::Less,
                    CmpOp::Lte => compare_bson(v, value) != Ordering::Greater,
                }
            } else {
                false
            }
        }
    }
}

/// Stable, left-to-right tie-break chain over the sort keys. A missing
/// key orders before a present one.
pub fn compare_docs(a: &BsonDocument, b: &BsonDocument, sort: &[SortSpec]) -> Ordering {
    for s in sort.iter().take(MAX_SORT_FIELDS) {
        let va = get_path(a, &s.field);
        let vb = get_path(b, &s.field);
        let ord = match (va, vb) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return if matches!(s.order, super::types::Order::Asc) { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

fn get_path<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    if path.is_empty() || path.len() > 1024 {
        return None;
    }
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() > MAX_PATH_DEPTH {
        return None;
    }
    let mut cur = doc;
    for (i, part) in parts.iter().enumerate() {
        let leaf = i + 1 == parts.len();
        match cur.get(part) {
            Some(v) if leaf => return Some(v),
            Some(Bson::Document(d)) => cur = d,
            _ => return None,
        }
    }
    None
}

pub fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    use bson::Bson as T;
    fn is_num(x: &T) -> bool {
        matches!(x, T::Int32(_) | T::Int64(_) | T::Double(_))
    }
    fn as_f64_num(x: &T) -> f64 {
        match x {
            T::Int32(i) => f64::from(*i),
            T::Int64(i) => *i as f64,
            T::Double(f) => *f,
            _ => f64::NAN,
        }
    }
    if is_num(a) && is_num(b) {
        return as_f64_num(a).total_cmp(&as_f64_num(b));
    }
    match (a, b) {
        (T::String(x), T::String(y)) => x.cmp(y),
        (T::Boolean(x), T::Boolean(y)) => x.cmp(y),
        (T::DateTime(x), T::DateTime(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(v: &Bson) -> u8 {
    use bson::Bson as T;
    match v {
        T::Null => 0,
        T::Boolean(_) => 1,
        T::Int32(_) => 2,
        T::Int64(_) => 3,
        T::Double(_) => 4,
        T::String(_) => 5,
        T::Array(_) => 6,
        T::Document(_) => 7,
        T::DateTime(_) => 8,
        _ => 250,
    }
}

/// Apply the request's field selection. The allow-list always retains
/// `_id`; the default view hides only the internal revision field.
#[must_use]
pub fn apply_projection(doc: &BsonDocument, projection: &Projection) -> BsonDocument {
    match projection {
        Projection::Default => strip_internal(doc),
        Projection::Include(fields) => {
            let mut out = BsonDocument::new();
            if let Some(id) = doc.get(ID_FIELD) {
                out.insert(ID_FIELD, id.clone());
            }
            for f in fields {
                if let Some(v) = doc.get(f) {
                    out.insert(f.clone(), v.clone());
                }
            }
            out
        }
    }
}

#[must_use]
pub fn strip_internal(doc: &BsonDocument) -> BsonDocument {
    let mut out = doc.clone();
    out.remove(REVISION_FIELD);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Order;
    use bson::doc;

    #[test]
    fn cmp_crosses_numeric_types() {
        assert_eq!(compare_bson(&Bson::Int32(5), &Bson::Double(5.0)), Ordering::Equal);
        assert_eq!(compare_bson(&Bson::Int64(400), &Bson::Double(399.5)), Ordering::Greater);
    }

    #[test]
    fn filter_on_missing_path_is_false() {
        let d = doc! {"price": 100};
        let f = Filter::Cmp { path: "rating".into(), op: CmpOp::Gte, value: Bson::Int64(1) };
        assert!(!eval_filter(&d, &f));
        assert!(eval_filter(&d, &Filter::Not(Box::new(f))));
    }

    #[test]
    fn dotted_paths_reach_into_subdocuments() {
        let d = doc! {"startLocation": {"address": "x", "day": 3}};
        let f = Filter::Cmp {
            path: "startLocation.day".into(),
            op: CmpOp::Eq,
            value: Bson::Int64(3),
        };
        assert!(eval_filter(&d, &f));
    }

    #[test]
    fn multi_key_sort_breaks_ties_left_to_right() {
        let a = doc! {"price": 100, "name": "b"};
        let b = doc! {"price": 100, "name": "a"};
        let sort = vec![
            SortSpec { field: "price".into(), order: Order::Desc },
            SortSpec { field: "name".into(), order: Order::Asc },
        ];
        assert_eq!(compare_docs(&a, &b, &sort), Ordering::Greater);
    }

    #[test]
    fn projection_keeps_id_and_default_hides_rev() {
        let d = doc! {"_id": "x", "name": "n", "price": 1, "_rev": 4i64};
        let p = apply_projection(&d, &Projection::Include(vec!["name".into()]));
        assert_eq!(p.get_str("_id").unwrap(), "x");
        assert!(p.get("price").is_none());
        let p = apply_projection(&d, &Projection::Default);
        assert!(p.get("_rev").is_none());
        assert!(p.get("price").is_some());
    }
}
