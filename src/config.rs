//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;
use chrono::Weekday;

/// The first day of a week in the calendar grid, unless a [`CalendarGridBuilder`](crate::grid::CalendarGridBuilder) is built with another one.
pub const DEFAULT_WEEK_START: Weekday = Weekday::Sun;

/// The key appointments are stored under in a [`Backend`](crate::backend::Backend)
pub const STORAGE_KEY: &str = "appointments";

/// Part of the ProdID string that describes the organization (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
/// Feel free to override it when initing this library.
pub static ORG_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("My organization".to_string())));

/// Part of the ProdID string that describes the product name (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
/// Feel free to override it when initing this library.
pub static PRODUCT_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("WallCalendar".to_string())));

/// The iCal PRODID built from [`ORG_NAME`] and [`PRODUCT_NAME`]
pub fn prod_id() -> String {
    let org = ORG_NAME.lock().map(|s| s.clone()).unwrap_or_default();
    let product = PRODUCT_NAME.lock().map(|s| s.clone()).unwrap_or_default();
    format!("-//{}//{}//EN", org, product)
}
