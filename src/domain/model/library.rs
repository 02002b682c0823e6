use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::book::{AddBookRequest, Book, ReadStatus, UpdateBookRequest};
use crate::domain::error::DomainError;

/// 検索対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
}

impl FromStr for SearchField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            other => Err(DomainError::InvalidArgument(format!(
                "unknown search field: '{other}'. Use: title, author"
            ))),
        }
    }
}

/// 並び替えキー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Author,
    Year,
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "year" => Ok(Self::Year),
            other => Err(DomainError::InvalidArgument(format!(
                "unknown sort key: '{other}'. Use: title, author, year"
            ))),
        }
    }
}

/// 既読統計
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistics {
    /// 蔵書0冊。割合は定義しない。
    Empty,
    Summary {
        total: usize,
        read_count: usize,
        /// 小数点以下2桁に丸めた百分率
        read_percentage: f64,
    },
}

/// Library — 集約ルート。全蔵書操作はここを経由する。
///
/// 順序は挿入順（sort_byで明示的に並び替えた場合を除く）。
/// タイトル指定の操作は大文字小文字を無視し、常に最初の一致だけを対象にする。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 最初に一致した蔵書を返す。
    pub fn find(&self, title: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.title_matches(title))
    }

    /// 末尾に追加する。重複チェックはしない。
    pub fn add_book(&mut self, req: AddBookRequest) -> &Book {
        self.books.push(req.into_book());
        let last = self.books.len() - 1;
        &self.books[last]
    }

    /// 最初の一致を削除し、削除した蔵書を返す。
    pub fn remove_book(&mut self, title: &str) -> Result<Book, DomainError> {
        let pos = self.position_of(title)?;
        Ok(self.books.remove(pos))
    }

    /// 蔵書更新。Noneまたは空白のフィールドは現在値を維持する。
    pub fn update_book(
        &mut self,
        title: &str,
        req: UpdateBookRequest,
    ) -> Result<&Book, DomainError> {
        let pos = self.position_of(title)?;
        let book = &mut self.books[pos];

        if let Some(new_title) = req.title.filter(|t| !t.trim().is_empty()) {
            book.set_title(new_title);
        }
        if let Some(author) = req.author.filter(|a| !a.trim().is_empty()) {
            book.set_author(author);
        }
        if let Some(year) = req.year {
            book.set_year(year);
        }
        if let Some(genre) = req.genre.filter(|g| !g.trim().is_empty()) {
            book.set_genre(genre);
        }

        Ok(&self.books[pos])
    }

    /// 既読/未読を反転し、反転後の状態を返す。
    pub fn toggle_read(&mut self, title: &str) -> Result<ReadStatus, DomainError> {
        let pos = self.position_of(title)?;
        Ok(self.books[pos].toggle_read())
    }

    /// 部分一致検索（大文字小文字無視）。空文字列は全件に一致する。
    pub fn search(&self, field: SearchField, query: &str) -> Vec<&Book> {
        let query = query.to_lowercase();
        self.books
            .iter()
            .filter(|b| {
                let value = match field {
                    SearchField::Title => b.title(),
                    SearchField::Author => b.author(),
                };
                value.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// 安定ソート。文字列キーは小文字化して比較する。
    pub fn sort_by(&mut self, key: SortKey) {
        match key {
            SortKey::Title => self.books.sort_by_cached_key(|b| b.title().to_lowercase()),
            SortKey::Author => self.books.sort_by_cached_key(|b| b.author().to_lowercase()),
            SortKey::Year => self.books.sort_by_key(|b| b.year()),
        }
    }

    pub fn statistics(&self) -> Statistics {
        let total = self.books.len();
        if total == 0 {
            return Statistics::Empty;
        }
        let read_count = self.books.iter().filter(|b| b.is_read()).count();
        let ratio = read_count as f64 / total as f64 * 100.0;
        Statistics::Summary {
            total,
            read_count,
            read_percentage: (ratio * 100.0).round() / 100.0,
        }
    }

    // --- Private helpers ---

    fn position_of(&self, title: &str) -> Result<usize, DomainError> {
        self.books
            .iter()
            .position(|b| b.title_matches(title))
            .ok_or_else(|| DomainError::NotFound(title.to_string()))
    }
}
