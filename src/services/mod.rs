pub mod dashboard;
pub mod scrape;
pub mod server;
