use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// 既読状態。`Book::read` のbool値を表示用に解釈したもの。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    Read,
    Unread,
}

impl From<bool> for ReadStatus {
    fn from(read: bool) -> Self {
        if read {
            Self::Read
        } else {
            Self::Unread
        }
    }
}

impl fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("Read"),
            Self::Unread => f.write_str("Unread"),
        }
    }
}

/// 蔵書レコード。Libraryが所有し、Libraryを通じて操作する。
///
/// フィールド順はそのまま永続化JSONのキー順になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    year: i32,
    genre: String,
    read: bool,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    pub fn status(&self) -> ReadStatus {
        ReadStatus::from(self.read)
    }

    /// タイトルの大文字小文字を無視した一致判定。全タイトル検索で共通のルール。
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    // --- 内部操作（Library経由でのみ呼ばれる） ---

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn set_author(&mut self, author: String) {
        self.author = author;
    }

    pub(crate) fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    pub(crate) fn set_genre(&mut self, genre: String) {
        self.genre = genre;
    }

    pub(crate) fn toggle_read(&mut self) -> ReadStatus {
        self.read = !self.read;
        self.status()
    }
}

/// `<title> by <author> (<year>) - <genre> - <Read|Unread>`
impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {}",
            self.title,
            self.author,
            self.year,
            self.genre,
            self.status()
        )
    }
}

/// 出版年の文字列を整数に変換する。前後の空白は無視する。
pub fn parse_year(input: &str) -> Result<i32, DomainError> {
    let trimmed = input.trim();
    trimmed.parse::<i32>().map_err(|_| {
        DomainError::Validation(format!("year must be an integer, got '{trimmed}'"))
    })
}

/// 空白のみの入力を「未指定」として扱う。
fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 蔵書追加リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub read: bool,
}

impl AddBookRequest {
    /// 入力文字列から組み立てる。yearが整数でなければValidationエラー。
    pub fn from_input(
        title: &str,
        author: &str,
        year: &str,
        genre: &str,
        read: bool,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            title: title.trim().to_string(),
            author: author.trim().to_string(),
            year: parse_year(year)?,
            genre: genre.trim().to_string(),
            read,
        })
    }

    pub fn into_book(self) -> Book {
        Book::new(self.title, self.author, self.year, self.genre, self.read)
    }
}

/// 蔵書更新リクエスト（Noneまたは空白のフィールドは変更しない）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
}

impl UpdateBookRequest {
    /// 入力文字列から組み立てる。空欄は現状維持。
    /// yearは変更前に検証されるため、部分的な更新は起こらない。
    pub fn from_input(
        title: &str,
        author: &str,
        year: &str,
        genre: &str,
    ) -> Result<Self, DomainError> {
        let year = match non_blank(year) {
            Some(y) => Some(parse_year(&y)?),
            None => None,
        };
        Ok(Self {
            title: non_blank(title),
            author: non_blank(author),
            year,
            genre: non_blank(genre),
        })
    }
}
