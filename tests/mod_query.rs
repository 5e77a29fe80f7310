use bson::doc;
use tourbase::Catalog;
use tourbase::errors::ApiError;

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn tour_payload(name: &str, price: i32) -> bson::Document {
    doc! {
        "name": name,
        "duration": 5,
        "maxGroupSize": 10,
        "difficulty": "easy",
        "price": price,
        "summary": "A lovely walk in the hills",
        "imageCover": "cover.jpg",
    }
}

fn seeded_catalog() -> Catalog {
    let catalog = Catalog::new();
    let tours = catalog.tours();
    for (name, price) in [
        ("The Forest Hiker", 50),
        ("The Sea Explorer", 150),
        ("The Snow Adventurer", 400),
        ("The Desert Crawler", 600),
    ] {
        tours.create_one(tour_payload(name, price)).unwrap();
    }
    catalog
}

#[test]
fn range_filter_sort_and_window() {
    // ?price[gte]=100&price[lte]=500&sort=-price&limit=2&page=1
    let catalog = seeded_catalog();
    let (docs, total) = catalog
        .tours()
        .list_all(&pairs(&[
            ("price[gte]", "100"),
            ("price[lte]", "500"),
            ("sort", "-price"),
            ("limit", "2"),
            ("page", "1"),
        ]))
        .unwrap();
    assert_eq!(total, 2);
    assert!(docs.len() <= 2);
    let prices: Vec<i32> = docs.iter().map(|d| d.get_i32("price").unwrap()).collect();
    assert_eq!(prices, vec![400, 150]);
    assert!(prices.iter().all(|p| (100..=500).contains(p)));
}

#[test]
fn pagination_boundaries_fall_back_to_defaults() {
    let catalog = seeded_catalog();
    let (docs, total) =
        catalog.tours().list_all(&pairs(&[("page", "0"), ("limit", "-5")])).unwrap();
    // defaults: page 1, limit 100 — everything fits on one page
    assert_eq!(docs.len(), 4);
    assert_eq!(total, 4);
}

#[test]
fn extreme_page_number_is_just_an_empty_page() {
    let catalog = seeded_catalog();
    let (docs, total) = catalog
        .tours()
        .list_all(&pairs(&[("page", "9223372036854775807"), ("limit", "100")]))
        .unwrap();
    assert!(docs.is_empty());
    assert_eq!(total, 4);
}

#[test]
fn page_past_the_end_is_empty_with_unaffected_total() {
    let catalog = seeded_catalog();
    let (docs, total) =
        catalog.tours().list_all(&pairs(&[("page", "99"), ("limit", "2")])).unwrap();
    assert!(docs.is_empty());
    assert_eq!(total, 4);
}

#[test]
fn default_projection_hides_the_revision_field() {
    let catalog = seeded_catalog();
    let (docs, _) = catalog.tours().list_all(&[]).unwrap();
    assert!(docs.iter().all(|d| d.get("_rev").is_none()));
    assert!(docs.iter().all(|d| d.get("_id").is_some()));
}

#[test]
fn field_allow_list_restricts_the_view() {
    let catalog = seeded_catalog();
    let (docs, _) = catalog.tours().list_all(&pairs(&[("fields", "name,price")])).unwrap();
    for d in &docs {
        assert!(d.get("name").is_some());
        assert!(d.get("price").is_some());
        assert!(d.get("duration").is_none());
        assert!(d.get("summary").is_none());
        // the identifier always travels with an allow-list
        assert!(d.get("_id").is_some());
    }
}

#[test]
fn unknown_filter_operator_is_rejected() {
    let catalog = seeded_catalog();
    let err = catalog.tours().list_all(&pairs(&[("price[near]", "100")])).unwrap_err();
    assert!(matches!(err, ApiError::InvalidQuery(_)));
}

#[test]
fn default_sort_is_newest_first() {
    let catalog = Catalog::new();
    let tours = catalog.tours();
    for (name, price) in
        [("The Forest Hiker", 50), ("The Sea Explorer", 150), ("The Snow Adventurer", 400)]
    {
        tours.create_one(tour_payload(name, price)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    let (docs, _) = tours.list_all(&[]).unwrap();
    assert_eq!(docs[0].get_str("name").unwrap(), "The Snow Adventurer");
    assert_eq!(docs[2].get_str("name").unwrap(), "The Forest Hiker");
}

#[test]
fn multi_key_sort_breaks_ties_left_to_right() {
    let catalog = Catalog::new();
    let tours = catalog.tours();
    tours.create_one(tour_payload("The Forest Hiker", 100)).unwrap();
    tours.create_one(tour_payload("The Sea Explorer", 100)).unwrap();
    tours.create_one(tour_payload("The Alp Climber", 300)).unwrap();
    let (docs, _) = tours.list_all(&pairs(&[("sort", "price,-name")])).unwrap();
    let names: Vec<&str> = docs.iter().map(|d| d.get_str("name").unwrap()).collect();
    assert_eq!(names, vec!["The Sea Explorer", "The Forest Hiker", "The Alp Climber"]);
}

#[test]
fn equality_filters_compose_with_ranges() {
    let catalog = seeded_catalog();
    let (docs, total) = catalog
        .tours()
        .list_all(&pairs(&[("difficulty", "easy"), ("price[gt]", "500")]))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(docs[0].get_str("name").unwrap(), "The Desert Crawler");
}
