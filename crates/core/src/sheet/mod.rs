pub mod a1;
pub mod sheets;
pub mod traits;
