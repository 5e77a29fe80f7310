use crate::document::Document;
use crate::store::Collection;
use std::sync::Arc;

use super::eval::{apply_projection, compare_docs, eval_filter};
use super::types::{Filter, QuerySpec};

/// Execute a spec against a collection in fixed stage order:
/// filter, sort, projection, pagination. Pagination last, so the window
/// never changes which documents qualify, only which slice is returned.
#[must_use]
pub fn find_docs(col: &Arc<Collection>, spec: &QuerySpec) -> Vec<Document> {
    let mut docs: Vec<Document> = col
        .get_all_documents()
        .into_iter()
        .filter(|d| eval_filter(&d.data, &spec.filter))
        .collect();

    docs.sort_by(|a, b| compare_docs(&a.data, &b.data, &spec.sort));

    for d in &mut docs {
        d.data = apply_projection(&d.data, &spec.projection);
    }

    let skip = spec.page.offset();
    let limit = spec.page.limit as usize;
    let end = skip.saturating_add(limit).min(docs.len());
    let window = if skip >= docs.len() { Vec::new() } else { docs[skip..end].to_vec() };
    log::debug!(
        "find collection={} matched={} skip={} limit={} returned={}",
        col.name_str(),
        docs.len(),
        skip,
        limit,
        window.len()
    );
    window
}

/// Count documents matching the filter, ignoring sort/projection/pagination.
#[must_use]
pub fn count_docs(col: &Arc<Collection>, filter: &Filter) -> usize {
    col.docs.read().iter().filter(|d| eval_filter(&d.data, filter)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::query::{CmpOp, Order, Page, Projection, SortSpec};
    use crate::store::Store;
    use bson::{Bson, doc};

    fn seeded() -> (Store, Arc<Collection>) {
        let store = Store::new();
        let col = store.create_collection("tours");
        for (name, price) in [("alps", 300), ("coast", 150), ("desert", 600)] {
            col.insert_document(Document::new(doc! {"name": name, "price": price}));
        }
        (store, col)
    }

    #[test]
    fn pipeline_filters_sorts_projects_and_windows() {
        let (_store, col) = seeded();
        let spec = QuerySpec {
            filter: Filter::Cmp { path: "price".into(), op: CmpOp::Gte, value: Bson::Int64(200) },
            sort: vec![SortSpec { field: "price".into(), order: Order::Desc }],
            projection: Projection::Include(vec!["name".into()]),
            page: Page { page: 1, limit: 1 },
        };
        let docs = find_docs(&col, &spec);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].data.get_str("name").unwrap(), "desert");
        assert!(docs[0].data.get("price").is_none());
        assert_eq!(count_docs(&col, &spec.filter), 2);
    }

    #[test]
    fn page_past_the_end_is_empty_but_count_is_unchanged() {
        let (_store, col) = seeded();
        let spec = QuerySpec { page: Page { page: 9, limit: 100 }, ..QuerySpec::default() };
        assert!(find_docs(&col, &spec).is_empty());
        assert_eq!(count_docs(&col, &spec.filter), 3);
    }
}
