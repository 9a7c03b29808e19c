pub mod models;
pub mod viewer;
