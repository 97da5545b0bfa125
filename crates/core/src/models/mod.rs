pub mod cell;
pub mod history;
pub mod holding;
pub mod quote;
pub mod report;
