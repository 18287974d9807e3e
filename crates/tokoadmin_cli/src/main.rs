//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tokoadmin_core` wiring against a data directory without a UI.
//! - Keep output deterministic: the feed runs on a virtual clock with a fixed seed.
//! - Start file logging so core events land in `TOKOADMIN_LOG_DIR`
//!   (default: `<temp>/tokoadmin`).
//!
//! Usage: `tokoadmin_cli [DATA_DIR] [SEARCH]`

use std::path::PathBuf;
use tokoadmin_core::{
    core_version, init_logging, Clock, Dashboard, DashboardConfig, JsonFileProvider, LogLevel,
    ManualClock, Record,
};

const DEFAULT_DATA_DIR: &str = "data";
const FEED_SEED: u64 = 2024;
const FEED_TICKS: i64 = 5;
const LOG_DIR_ENV: &str = "TOKOADMIN_LOG_DIR";

fn main() {
    let mut args = std::env::args().skip(1);
    let data_dir = args.next().unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    let search = args.next();

    println!("tokoadmin_core version={}", core_version());
    start_logging();

    let clock = ManualClock::new(0);
    let config = DashboardConfig::default();
    let feed_interval_ms = config.feed_interval_ms;
    let mut dashboard = Dashboard::new(config, JsonFileProvider::new(&data_dir), clock.clone())
        .with_feed_seed(FEED_SEED);

    match dashboard.load_products() {
        Ok(count) => println!("products loaded={count} dir={data_dir}"),
        Err(err) => {
            eprintln!("products load failed: {err}");
            std::process::exit(1);
        }
    }

    if let Some(text) = search {
        dashboard.products_mut().set_search_text(text);
    }
    let view = dashboard.products().view();
    println!(
        "page {}/{} ({} matching)",
        view.page_index,
        view.page_count,
        view.total()
    );
    for record in &view.current_page {
        println!("  {}", describe_product(record));
    }

    dashboard.start_feed();
    for _ in 0..FEED_TICKS {
        clock.advance(feed_interval_ms);
        dashboard.pump();
    }
    println!("feed at t={}ms:", clock.now_ms());
    for event in dashboard.feed().events() {
        println!(
            "  #{} {} total={} status={}",
            event.id,
            event.customer,
            event.total,
            event.status.as_str()
        );
    }
}

/// Logging failures are reported and never stop the probe.
fn start_logging() {
    let log_dir = resolve_log_dir(std::env::var_os(LOG_DIR_ENV).map(PathBuf::from));
    let level = LogLevel::build_default();
    match init_logging(level.as_str(), &log_dir.to_string_lossy()) {
        Ok(()) => println!("logging level={} dir={}", level.as_str(), log_dir.display()),
        Err(err) => eprintln!("logging disabled: {err}"),
    }
}

/// Absolute log directory: the override when given, else `<temp>/tokoadmin`.
fn resolve_log_dir(override_dir: Option<PathBuf>) -> PathBuf {
    let dir = override_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| std::env::temp_dir().join("tokoadmin"));
    if dir.is_absolute() {
        return dir;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&dir))
        .unwrap_or(dir)
}

fn describe_product(record: &Record) -> String {
    format!(
        "#{} {} [{}] {}",
        record.id,
        record.text("name").unwrap_or("-"),
        record.text("sku").unwrap_or("-"),
        record
            .get("price")
            .and_then(|value| value.as_number())
            .map(|price| format!("{price:.0}"))
            .unwrap_or_else(|| "-".to_string())
    )
}
