pub mod records;
pub mod scrape;
pub mod vision;
