//! SQLite-backed catalog store.

mod db;
mod migrations;

pub use db::{CatalogInfo, Database};
