pub mod api;
pub mod config;
pub mod error;
pub mod identity;
pub mod questions;
pub mod sheets;
pub mod submit;
pub mod table;
