use std::path::PathBuf;

use serde::Serialize;

use crate::domain::model::library::Library;
use crate::domain::repository::{LibraryRepository, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt library file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StorageError for JsonStoreError {
    fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// JSONファイルによるLibraryRepository実装。
/// 1 Library = 1 JSONファイル（蔵書オブジェクトの配列）。
pub struct JsonLibraryRepository {
    path: PathBuf,
}

impl JsonLibraryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// 4スペースインデントで整形する。
fn to_pretty_json(library: &Library) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    library.serialize(&mut ser)?;
    Ok(buf)
}

impl LibraryRepository for JsonLibraryRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Library, Self::Error> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "library file missing, starting empty");
            return Ok(Library::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|source| JsonStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = to_pretty_json(library).map_err(JsonStoreError::Encode)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
