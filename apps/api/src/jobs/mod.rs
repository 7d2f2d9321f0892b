// Read-only job listings. Rows are written by the external scraper.

pub mod handlers;
pub mod query;
