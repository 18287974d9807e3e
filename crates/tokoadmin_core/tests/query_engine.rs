use std::collections::BTreeMap;
use tokoadmin_core::{
    FieldValue, LoadError, QueryEngine, Record, RecordValidationError, SortDirection,
    ORDER_SCHEMA, PRODUCT_SCHEMA,
};

fn product(id: i64, name: &str, category: &str, price: f64) -> Record {
    Record::new(id)
        .with_field("name", name)
        .with_field("description", format!("Deskripsi {name}"))
        .with_field("sku", format!("TKO-{id:04}"))
        .with_field("category", category)
        .with_field("price", price)
}

fn order(id: i64, customer: &str, status: &str, timestamp: i64) -> Record {
    Record::new(id)
        .with_field("customer", customer)
        .with_field("total", 100.0)
        .with_field("status", FieldValue::Status(status.to_string()))
        .with_field("timestamp", FieldValue::Timestamp(timestamp))
}

fn names(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .map(|record| record.text("name").unwrap())
        .collect()
}

fn ids(records: &[Record]) -> Vec<i64> {
    records.iter().map(|record| record.id).collect()
}

fn catalog(count: i64) -> Vec<Record> {
    (1..=count)
        .map(|id| {
            let category = if id % 3 == 0 { "Minuman" } else { "Makanan" };
            product(id, &format!("Produk {id:03}"), category, (id * 1000) as f64)
        })
        .collect()
}

#[test]
fn sorts_case_insensitively_and_searches_substrings() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine
        .load(vec![
            product(1, "Cherry", "Buah", 3.0),
            product(2, "banana", "Buah", 2.0),
            product(3, "Apple", "Buah", 1.0),
        ])
        .unwrap();

    assert!(engine.set_sort_field("name"));
    engine.set_sort_direction(SortDirection::Ascending);
    assert_eq!(
        names(&engine.view().filtered_ordered),
        vec!["Apple", "banana", "Cherry"]
    );

    engine.set_search_text("an");
    assert_eq!(names(&engine.view().filtered_ordered), vec!["banana"]);
}

#[test]
fn search_matches_description_and_sku_ignoring_case() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine.load(catalog(12)).unwrap();

    engine.set_search_text("tko-0007");
    assert_eq!(ids(&engine.view().filtered_ordered), vec![7]);

    engine.set_search_text("DESKRIPSI PRODUK 01");
    assert_eq!(ids(&engine.view().filtered_ordered), vec![10, 11, 12]);

    engine.set_search_text("tidak ada");
    assert!(engine.view().is_empty());
    assert_eq!(engine.view().page_count, 0);
    assert!(engine.view().current_page.is_empty());
}

#[test]
fn current_page_is_always_the_matching_slice() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine.load(catalog(23)).unwrap();

    for page_size in [1, 4, 5, 7, 23, 50] {
        engine.set_page_size(page_size);
        let page_count = engine.view().page_count;
        assert_eq!(page_count, 23usize.div_ceil(page_size));

        for page_index in 1..=page_count {
            assert_eq!(engine.set_page_index(page_index), page_index);
            let view = engine.view();
            let start = (page_index - 1) * page_size;
            let end = (start + page_size).min(view.filtered_ordered.len());
            assert!(view.current_page.len() <= page_size);
            assert_eq!(view.current_page, view.filtered_ordered[start..end].to_vec());
        }
    }
}

#[test]
fn page_index_is_clamped() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA).with_page_size(5);
    engine.load(catalog(12)).unwrap();

    assert_eq!(engine.set_page_index(0), 1);
    assert_eq!(engine.set_page_index(99), 3);
    assert_eq!(engine.view().current_page.len(), 2);

    let mut empty = QueryEngine::new(&PRODUCT_SCHEMA);
    assert_eq!(empty.set_page_index(4), 1);
}

#[test]
fn setters_return_to_first_page() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA).with_page_size(2);
    engine.load(catalog(10)).unwrap();

    engine.set_page_index(3);
    engine.set_sort_direction(SortDirection::Descending);
    assert_eq!(engine.state().page_index, 1);

    engine.set_page_index(3);
    engine.set_category_filter(Some("Makanan"));
    assert_eq!(engine.view().page_index, 1);

    engine.set_page_index(2);
    engine.set_search_text("Produk");
    assert_eq!(engine.view().page_index, 1);

    engine.set_page_index(3);
    assert!(engine.set_sort_field("price"));
    assert_eq!(engine.state().page_index, 1);
    assert_eq!(engine.view().page_index, 1);
}

#[test]
fn order_search_covers_customer_and_status() {
    let mut engine = QueryEngine::new(&ORDER_SCHEMA);
    engine
        .load(vec![
            order(1, "Sari Wulandari", "pending", 1_000),
            order(2, "Andi Pratama", "shipped", 2_000),
            order(3, "Budi Santoso", "processing", 3_000),
        ])
        .unwrap();

    engine.set_search_text("sari");
    assert_eq!(ids(&engine.view().filtered_ordered), vec![1]);

    engine.set_search_text("SHIP");
    assert_eq!(ids(&engine.view().filtered_ordered), vec![2]);

    engine.set_search_text("an");
    assert_eq!(ids(&engine.view().filtered_ordered), vec![1, 2, 3]);
}

#[test]
fn any_required_field_is_a_sort_key() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine
        .load(vec![
            product(1, "Teh", "Minuman", 5.0).with_field("description", "zaitun"),
            product(2, "Kopi", "Minuman", 5.0).with_field("description", "Arabika"),
        ])
        .unwrap();

    assert!(engine.set_sort_field("description"));
    assert_eq!(ids(&engine.view().filtered_ordered), vec![2, 1]);
}

#[test]
fn edits_keep_the_current_page_while_it_exists() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA).with_page_size(2);
    engine.load(catalog(10)).unwrap();
    engine.set_page_index(3);

    let mut partial = BTreeMap::new();
    partial.insert("stock".to_string(), FieldValue::Number(7.0));
    assert!(engine.update_record(5, &partial));
    assert_eq!(engine.view().page_index, 3);
    assert_eq!(ids(&engine.view().current_page), vec![5, 6]);

    engine.delete_record(1).unwrap();
    assert_eq!(engine.view().page_index, 3);
    assert_eq!(ids(&engine.view().current_page), vec![6, 7]);
}

#[test]
fn category_filter_is_exact_and_clearable() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine.load(catalog(9)).unwrap();

    engine.set_category_filter(Some("Minuman"));
    assert_eq!(ids(&engine.view().filtered_ordered), vec![3, 6, 9]);

    engine.set_category_filter(Some("minuman"));
    assert!(engine.view().is_empty());

    engine.set_category_filter(Some(""));
    assert_eq!(engine.state().category_filter, None);
    assert_eq!(engine.view().total(), 9);

    assert_eq!(
        engine.categories(),
        vec!["Makanan".to_string(), "Minuman".to_string()]
    );
}

#[test]
fn sort_is_stable_in_both_directions_and_repeatable() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine
        .load(vec![
            product(1, "Teh", "A", 10.0),
            product(2, "Kopi", "A", 10.0),
            product(3, "Susu", "B", 5.0),
            product(4, "Air", "A", 10.0),
        ])
        .unwrap();

    engine.set_sort_field("category");
    assert_eq!(ids(&engine.view().filtered_ordered), vec![1, 2, 4, 3]);

    engine.set_sort_direction(SortDirection::Descending);
    assert_eq!(ids(&engine.view().filtered_ordered), vec![3, 1, 2, 4]);

    let once = engine.view().filtered_ordered.clone();
    engine.set_sort_field("category");
    engine.set_sort_field("category");
    assert_eq!(engine.view().filtered_ordered, once);

    engine.set_sort_field("price");
    engine.set_sort_direction(SortDirection::Ascending);
    assert_eq!(ids(&engine.view().filtered_ordered), vec![3, 1, 2, 4]);
}

#[test]
fn search_filter_is_idempotent() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine.load(catalog(30)).unwrap();

    engine.set_search_text("produk 02");
    let first = engine.view().filtered_ordered.clone();
    engine.set_search_text("produk 02");
    assert_eq!(engine.view().filtered_ordered, first);
    assert_eq!(first.len(), 10);
}

#[test]
fn unknown_sort_field_is_ignored() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine.load(catalog(3)).unwrap();
    engine.set_sort_field("price");

    assert!(!engine.set_sort_field("warehouse"));
    assert!(!engine.set_sort_field(""));
    assert_eq!(engine.state().sort_field, "price");
}

#[test]
fn update_record_merges_fields_and_resorts() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine
        .load(vec![
            product(1, "Beras", "Sembako", 60000.0),
            product(2, "Gula", "Sembako", 15000.0),
        ])
        .unwrap();

    let mut partial = BTreeMap::new();
    partial.insert("name".to_string(), FieldValue::from("Abon"));
    partial.insert("stock".to_string(), FieldValue::Number(4.0));
    assert!(engine.update_record(2, &partial));

    assert_eq!(names(&engine.view().filtered_ordered), vec!["Abon", "Beras"]);
    let updated = engine.record(2).unwrap();
    assert_eq!(updated.get("stock"), Some(&FieldValue::Number(4.0)));
    assert_eq!(updated.text("sku"), Some("TKO-0002"));
}

#[test]
fn update_that_breaks_schema_is_ignored() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine.load(catalog(2)).unwrap();
    let before = engine.view().clone();

    let mut partial = BTreeMap::new();
    partial.insert("price".to_string(), FieldValue::from("gratis"));
    assert!(!engine.update_record(1, &partial));
    assert_eq!(engine.view(), &before);
}

#[test]
fn delete_then_update_is_a_no_op() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine.load(catalog(3)).unwrap();

    let removed = engine.delete_record(2).unwrap();
    assert_eq!(removed.id, 2);
    assert_eq!(ids(&engine.view().filtered_ordered), vec![1, 3]);

    let snapshot = engine.view().clone();
    let mut partial = BTreeMap::new();
    partial.insert("name".to_string(), FieldValue::from("Hidup lagi"));
    assert!(!engine.update_record(2, &partial));
    assert!(engine.delete_record(2).is_none());
    assert_eq!(engine.view(), &snapshot);
}

#[test]
fn malformed_load_is_rejected_without_partial_overwrite() {
    let mut engine = QueryEngine::new(&PRODUCT_SCHEMA);
    engine.load(catalog(4)).unwrap();
    let before = engine.view().clone();

    let mut broken = catalog(2);
    broken[1].fields.remove("description");
    let err = engine.load(broken).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid(RecordValidationError::MissingField {
            record_id: 2,
            field: "description"
        })
    ));
    assert_eq!(engine.records().len(), 4);
    assert_eq!(engine.view(), &before);
}
