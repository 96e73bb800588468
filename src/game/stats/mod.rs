pub mod base;
pub mod types;
