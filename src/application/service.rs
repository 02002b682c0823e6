use crate::domain::error::DomainError;
use crate::domain::model::library::Library;
use crate::domain::repository::{LibraryRepository, StorageError};

use super::error::AppError;

/// Libraryの読み込み・保存に関するユースケース。
///
/// 対話メニューは起動時に一度loadし、終了時にsaveする。
/// MCPは1リクエストごとに apply（load → mutate → save）する。
pub struct LibraryService<R: LibraryRepository> {
    repo: R,
}

impl<R: LibraryRepository> LibraryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// 永続化されたLibraryを読み込む。ファイルが無ければ空。
    pub fn load(&self) -> Result<Library, AppError> {
        let library = self.repo.load().map_err(Self::storage_error)?;
        tracing::info!(books = library.len(), "library loaded");
        Ok(library)
    }

    /// Library全体を上書き保存する。
    pub fn save(&self, library: &Library) -> Result<(), AppError> {
        self.repo.save(library).map_err(Self::storage_error)?;
        tracing::info!(books = library.len(), "library saved");
        Ok(())
    }

    /// load → 操作 → save。操作が失敗した場合は保存しない。
    pub fn apply<T>(
        &self,
        op: impl FnOnce(&mut Library) -> Result<T, DomainError>,
    ) -> Result<T, AppError> {
        let mut library = self.load()?;
        let out = op(&mut library)
            .inspect_err(|e| tracing::debug!(error = %e, "operation rejected"))?;
        self.save(&library)?;
        Ok(out)
    }

    // --- private ---

    fn storage_error(e: R::Error) -> AppError {
        if e.is_corrupt() {
            tracing::warn!(error = %e, "library file is corrupt");
            AppError::CorruptData(Box::new(e))
        } else {
            tracing::warn!(error = %e, "library storage failed");
            AppError::Storage(Box::new(e))
        }
    }
}
