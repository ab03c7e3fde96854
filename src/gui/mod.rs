pub mod application;
pub mod flow;
pub mod screens;
pub mod style;
pub mod types;
