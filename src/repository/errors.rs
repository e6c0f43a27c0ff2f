use std::path::PathBuf;

use thiserror::Error;

use crate::domain::document::ShapeError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected structure in '{}': {source}", .path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: ShapeError,
    },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
