pub mod color;
pub mod control;
pub mod types;
