pub mod traits;
pub mod yahoo;
