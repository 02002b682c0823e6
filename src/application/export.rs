use std::path::{Path, PathBuf};

use crate::domain::model::book::Book;
use crate::domain::model::library::{Library, Statistics};

use super::error::AppError;

/// Library → 表示用テキストへの変換とファイル書き出し
pub struct ExportService;

impl ExportService {
    /// 1冊1行のテキスト。各行は改行で終わる。
    pub fn render_text(library: &Library) -> String {
        let mut buf = String::new();
        for book in library.books() {
            buf.push_str(&book.to_string());
            buf.push('\n');
        }
        buf
    }

    /// `1. <title> by ...` 形式の番号付き一覧。
    pub fn render_listing<'a>(books: impl IntoIterator<Item = &'a Book>) -> String {
        books
            .into_iter()
            .enumerate()
            .map(|(i, book)| format!("{}. {}\n", i + 1, book))
            .collect()
    }

    pub fn render_statistics(stats: &Statistics) -> String {
        match stats {
            Statistics::Empty => "No books in the library.\n".to_string(),
            Statistics::Summary {
                total,
                read_percentage,
                ..
            } => format!("Total books: {total}\nPercentage read: {read_percentage:.2}%\n"),
        }
    }

    /// テキストを書き出す。既存ファイルは上書き。
    pub fn export(library: &Library, path: &Path) -> Result<PathBuf, AppError> {
        let content = Self::render_text(library);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(AppError::ExportIo)?;
            }
        }

        std::fs::write(path, content).map_err(AppError::ExportIo)?;
        tracing::info!(path = %path.display(), books = library.len(), "library exported");
        Ok(path.to_path_buf())
    }
}
