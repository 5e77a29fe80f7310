use proptest::prelude::*;
use tourbase::document::Document;
use tourbase::query::{QuerySpec, find_docs};
use tourbase::store::Store;

fn seeded(prices: &[i64]) -> (Store, Vec<String>) {
    let store = Store::new();
    let col = store.create_collection("items");
    let mut ids = Vec::new();
    for (i, p) in prices.iter().enumerate() {
        let id = col.insert_document(Document::new(bson::doc! {"price": *p, "seq": i as i64}));
        ids.push(id.to_string());
    }
    (store, ids)
}

fn id_list(store: &Store, spec: &QuerySpec) -> Vec<String> {
    let col = store.get_collection("items").unwrap();
    find_docs(&col, spec).iter().map(|d| d.id.to_string()).collect()
}

proptest! {
    #[test]
    fn prop_parameter_order_never_changes_the_result(
        prices in proptest::collection::vec(0i64..1000, 0..40),
        lo in 0i64..1000,
        hi in 0i64..1000,
        shuffled in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
    ) {
        let (store, _) = seeded(&prices);
        let params: Vec<(String, String)> = vec![
            ("price[gte]".into(), lo.to_string()),
            ("price[lte]".into(), hi.to_string()),
            ("sort".into(), "price,seq".into()),
            ("limit".into(), "10".into()),
        ];
        let reordered: Vec<(String, String)> =
            shuffled.iter().map(|&i| params[i].clone()).collect();
        let canonical = QuerySpec::from_params(&params).unwrap();
        let permuted = QuerySpec::from_params(&reordered).unwrap();
        prop_assert_eq!(id_list(&store, &canonical), id_list(&store, &permuted));
    }

    #[test]
    fn prop_pagination_windows_the_full_ordering(
        prices in proptest::collection::vec(0i64..1000, 0..60),
        page in 1u64..6,
        limit in 1u64..10,
    ) {
        let (store, _) = seeded(&prices);
        let all = QuerySpec::from_params(&[
            ("sort".to_string(), "price,seq".to_string()),
        ]).unwrap();
        let windowed = QuerySpec::from_params(&[
            ("sort".to_string(), "price,seq".to_string()),
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), limit.to_string()),
        ]).unwrap();
        let full = id_list(&store, &all);
        let window = id_list(&store, &windowed);

        let offset = ((page - 1) * limit) as usize;
        let expected: Vec<String> = full
            .iter()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect();
        prop_assert_eq!(window, expected);
    }

    #[test]
    fn prop_windows_tile_the_filtered_set(
        prices in proptest::collection::vec(0i64..100, 0..50),
        limit in 1u64..8,
    ) {
        let (store, _) = seeded(&prices);
        let all = QuerySpec::from_params(&[
            ("price[lt]".to_string(), "50".to_string()),
            ("sort".to_string(), "price,seq".to_string()),
        ]).unwrap();
        let full = id_list(&store, &all);

        // walking page by page recovers the whole filtered set exactly once
        let mut collected = Vec::new();
        let mut page = 1u64;
        loop {
            let spec = QuerySpec::from_params(&[
                ("price[lt]".to_string(), "50".to_string()),
                ("sort".to_string(), "price,seq".to_string()),
                ("page".to_string(), page.to_string()),
                ("limit".to_string(), limit.to_string()),
            ]).unwrap();
            let window = id_list(&store, &spec);
            if window.is_empty() {
                break;
            }
            collected.extend(window);
            page += 1;
        }
        prop_assert_eq!(collected, full);
    }
}
