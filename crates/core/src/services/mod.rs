pub mod history;
pub mod matcher;
pub mod refresher;
pub mod sync;
