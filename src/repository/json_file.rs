use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::domain::category::CategoryRef;
use crate::domain::document::{CatalogDocument, parse_batch, parse_category_dump};
use crate::domain::product::{BatchItem, UnmatchedItem};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    BatchReader, CatalogReader, CatalogWriter, CategoryListReader, CategoryListWriter,
    UnmatchedWriter,
};

/// Filesystem-backed repository reading and writing UTF-8 JSON documents.
///
/// Output is indented with four spaces and keeps non-ASCII text verbatim.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFileRepository;

impl JsonFileRepository {
    pub fn new() -> Self {
        Self
    }

    fn read_json(&self, path: &Path) -> RepositoryResult<Value> {
        let text = fs::read_to_string(path).map_err(|source| RepositoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| RepositoryError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_json<T>(&self, path: &Path, value: &T) -> RepositoryResult<()>
    where
        T: Serialize + ?Sized,
    {
        let io_error = |source| RepositoryError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = fs::File::create(path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        let mut serializer =
            Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        value
            .serialize(&mut serializer)
            .map_err(|source| RepositoryError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        writer.write_all(b"\n").map_err(io_error)?;
        writer.flush().map_err(io_error)?;

        log::debug!("Saved JSON file '{}'", path.display());
        Ok(())
    }
}

impl CatalogReader for JsonFileRepository {
    fn load_catalog(&self, path: &Path) -> RepositoryResult<CatalogDocument> {
        let value = self.read_json(path)?;
        CatalogDocument::from_value(value).map_err(|source| RepositoryError::Shape {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl CatalogWriter for JsonFileRepository {
    fn save_catalog(&self, path: &Path, catalog: &CatalogDocument) -> RepositoryResult<()> {
        self.write_json(path, catalog)
    }
}

impl BatchReader for JsonFileRepository {
    fn load_batch(&self, path: &Path) -> RepositoryResult<Vec<BatchItem>> {
        let value = self.read_json(path)?;
        parse_batch(value).map_err(|source| RepositoryError::Shape {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl UnmatchedWriter for JsonFileRepository {
    fn save_unmatched(&self, path: &Path, items: &[UnmatchedItem]) -> RepositoryResult<()> {
        self.write_json(path, items)
    }
}

impl CategoryListReader for JsonFileRepository {
    fn load_category_dump(&self, path: &Path) -> RepositoryResult<Vec<CategoryRef>> {
        let value = self.read_json(path)?;
        parse_category_dump(&value).map_err(|source| RepositoryError::Shape {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl CategoryListWriter for JsonFileRepository {
    fn save_categories(&self, path: &Path, categories: &[CategoryRef]) -> RepositoryResult<()> {
        self.write_json(path, categories)
    }
}

/// Expands directories into the `*.json` files they contain, sorted by name.
///
/// Plain paths are passed through untouched so that unreadable files surface
/// as load errors later; directories that cannot be listed are logged and
/// skipped.
pub fn resolve_batch_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut resolved = Vec::new();

    for path in paths {
        if !path.is_dir() {
            resolved.push(path.clone());
            continue;
        }

        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to list batch directory '{}': {e}", path.display());
                continue;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|file| file.is_file() && file.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        if files.is_empty() {
            log::warn!("No JSON files found in '{}'", path.display());
        } else {
            log::info!("Found {} JSON files in '{}'", files.len(), path.display());
        }
        resolved.extend(files);
    }

    resolved
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::{JsonFileRepository, resolve_batch_paths};
    use crate::domain::document::CatalogDocument;
    use crate::repository::errors::RepositoryError;
    use crate::repository::{BatchReader, CatalogReader, CatalogWriter};

    #[test]
    fn catalog_round_trip_keeps_non_ascii_text() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("catalog.json");
        let repo = JsonFileRepository::new();
        let catalog =
            CatalogDocument::from_value(json!([{"name": "Átmérő 20 mm", "sku": "A-20"}]))
                .expect("catalog");

        repo.save_catalog(&path, &catalog).expect("save");

        let text = fs::read_to_string(&path).expect("read back");
        assert!(text.contains("Átmérő 20 mm"));
        assert!(text.contains("\n        \"name\""));
        assert_eq!(repo.load_catalog(&path).expect("load"), catalog);
    }

    #[test]
    fn load_errors_name_their_cause() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = JsonFileRepository::new();

        let missing = repo.load_batch(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(RepositoryError::Io { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{\"products\": [").expect("write");
        assert!(matches!(
            repo.load_batch(&broken),
            Err(RepositoryError::Json { .. })
        ));

        let shapeless = dir.path().join("shapeless.json");
        fs::write(&shapeless, "{\"categories\": []}").expect("write");
        assert!(matches!(
            repo.load_batch(&shapeless),
            Err(RepositoryError::Shape { .. })
        ));
    }

    #[test]
    fn directories_expand_to_sorted_json_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        for name in ["b.json", "a.json", "notes.txt"] {
            fs::write(dir.path().join(name), "[]").expect("write");
        }

        // Not created yet; plain paths are passed through as given.
        let single = dir.path().join("single.json");

        let resolved = resolve_batch_paths(&[dir.path().to_path_buf(), single.clone()]);

        assert_eq!(
            resolved,
            vec![
                dir.path().join("a.json"),
                dir.path().join("b.json"),
                single,
            ]
        );
    }
}
