use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Can't read file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Malformed manifest {}: {reason}", file.display())]
    ManifestFormat { file: PathBuf, reason: String },

    #[error("Unknown node '{name}': it must be added before it is linked")]
    UnknownNode { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),
}

impl GraphError {
    pub(crate) fn format(file: &std::path::Path, reason: impl ToString) -> Self {
        GraphError::ManifestFormat { file: file.to_path_buf(), reason: reason.to_string() }
    }
}
