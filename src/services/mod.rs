//! Service layer - recipe catalog

pub mod recipe_service;

pub use recipe_service::{CatalogError, CatalogResult, MemoryRecipeCatalog, RecipeCatalog};
