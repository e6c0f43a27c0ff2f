use std::path::Path;

use crate::domain::category::CategoryRef;
use crate::domain::document::CatalogDocument;
use crate::domain::product::{BatchItem, UnmatchedItem};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod json_file;

pub use json_file::{JsonFileRepository, resolve_batch_paths};

pub trait CatalogReader {
    fn load_catalog(&self, path: &Path) -> RepositoryResult<CatalogDocument>;
}

pub trait CatalogWriter {
    fn save_catalog(&self, path: &Path, catalog: &CatalogDocument) -> RepositoryResult<()>;
}

pub trait BatchReader {
    fn load_batch(&self, path: &Path) -> RepositoryResult<Vec<BatchItem>>;
}

pub trait UnmatchedWriter {
    fn save_unmatched(&self, path: &Path, items: &[UnmatchedItem]) -> RepositoryResult<()>;
}

pub trait CategoryListReader {
    /// Loads a raw storefront category dump reduced to `{id, name, slug}`.
    fn load_category_dump(&self, path: &Path) -> RepositoryResult<Vec<CategoryRef>>;
}

pub trait CategoryListWriter {
    fn save_categories(&self, path: &Path, categories: &[CategoryRef]) -> RepositoryResult<()>;
}
