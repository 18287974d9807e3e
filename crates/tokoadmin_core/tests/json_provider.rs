use std::fs;
use tokoadmin_core::{
    ConfigError, Dashboard, DashboardConfig, DataProvider, FieldValue, JsonFileProvider,
    LoadError, ManualClock, ProviderError,
};

const PRODUCTS_JSON: &str = r#"{
  "products": [
    {"id": 1, "name": "Minyak Goreng", "description": "Kemasan 2L", "sku": "MNY-2L", "category": "Sembako", "price": 38000, "stock": 40},
    {"id": 2, "name": "beras pandan", "description": "Karung 5kg", "sku": "BRS-5K", "category": "Sembako", "price": 72000, "stock": 12},
    {"id": 3, "name": "Air Mineral", "description": "Botol 600ml", "sku": "AIR-600", "category": "Minuman", "price": 4000, "stock": 300}
  ]
}"#;

const ORDERS_JSON: &str = r#"{
  "orders": [
    {"id": 501, "customer": "Dewi", "total": 120, "status": "pending", "timestamp": "2024-05-01T09:30:00Z"},
    {"id": 502, "customer": "Eko", "total": 75, "status": "shipped", "timestamp": "2024-05-02 10:00:00"}
  ]
}"#;

fn data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("products.json"), PRODUCTS_JSON).unwrap();
    fs::write(dir.path().join("orders.json"), ORDERS_JSON).unwrap();
    dir
}

#[test]
fn reads_record_of_arrays_files() {
    let dir = data_dir();
    let provider = JsonFileProvider::new(dir.path());

    let products = provider.fetch_products().unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[1].text("sku"), Some("BRS-5K"));

    let orders = provider.fetch_orders().unwrap();
    assert_eq!(
        orders[1].get("timestamp"),
        Some(&FieldValue::Timestamp(1_714_644_000_000))
    );
}

#[test]
fn dashboard_loads_and_queries_file_data() {
    let dir = data_dir();
    let mut dashboard = Dashboard::new(
        DashboardConfig::default(),
        JsonFileProvider::new(dir.path()),
        ManualClock::new(0),
    );
    dashboard.load_products().unwrap();
    dashboard.load_orders().unwrap();

    let names: Vec<&str> = dashboard
        .products()
        .view()
        .filtered_ordered
        .iter()
        .map(|record| record.text("name").unwrap())
        .collect();
    assert_eq!(names, vec!["Air Mineral", "beras pandan", "Minyak Goreng"]);

    dashboard.products_mut().set_search_text("sembako");
    assert!(dashboard.products().view().is_empty());
    dashboard.products_mut().set_search_text("");
    dashboard.products_mut().set_category_filter(Some("Sembako"));
    assert_eq!(dashboard.products().view().total(), 2);

    dashboard.products_mut().set_category_filter(None);
    assert!(dashboard.products_mut().set_sort_field("stock"));
    let first = &dashboard.products().view().current_page[0];
    assert_eq!(first.id, 2);

    assert_eq!(dashboard.orders().view().current_page[0].id, 502);
}

#[test]
fn missing_file_and_bad_json_are_provider_errors() {
    let empty = tempfile::tempdir().unwrap();
    let mut dashboard = Dashboard::new(
        DashboardConfig::default(),
        JsonFileProvider::new(empty.path()),
        ManualClock::new(0),
    );
    let err = dashboard.load_products().unwrap_err();
    assert!(matches!(err, LoadError::Provider(ProviderError::Io { .. })));

    fs::write(empty.path().join("orders.json"), "{ not json").unwrap();
    let err = dashboard.load_orders().unwrap_err();
    assert!(matches!(err, LoadError::Provider(ProviderError::Json(_))));
    assert_eq!(dashboard.notifications().len(), 2);
}

#[test]
fn config_file_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.json");
    fs::write(&path, r#"{"page_size": 25, "feed_interval_ms": 1000}"#).unwrap();

    let config = DashboardConfig::load(&path).unwrap();
    assert_eq!(config.page_size, 25);
    assert_eq!(config.feed_config().interval_ms, 1_000);
    assert_eq!(config.feed_config().retention, 20);

    let missing = DashboardConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));
}
