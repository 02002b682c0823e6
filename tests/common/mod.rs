//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use book_shelf::application::service::LibraryService;
use book_shelf::domain::model::book::{AddBookRequest, Book};
use book_shelf::domain::model::library::Library;
use book_shelf::domain::repository::{LibraryRepository, StorageError};

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    #[error("in-memory store: corrupt payload")]
    Corrupt,
    #[error("in-memory store: write refused")]
    WriteRefused,
}

impl StorageError for InMemoryError {
    fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt)
    }
}

/// ファイルI/O不要のインメモリリポジトリ。JSON文字列として保持する。
pub struct InMemoryRepo {
    store: RefCell<Option<String>>,
    refuse_writes: Cell<bool>,
    saves: Cell<usize>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            store: RefCell::new(None),
            refuse_writes: Cell::new(false),
            saves: Cell::new(0),
        }
    }

    /// 任意の文字列を保存済みデータとして持つリポジトリ。
    pub fn with_raw(raw: &str) -> Self {
        let repo = Self::new();
        *repo.store.borrow_mut() = Some(raw.to_string());
        repo
    }

    pub fn refuse_writes(&self) {
        self.refuse_writes.set(true);
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn raw(&self) -> Option<String> {
        self.store.borrow().clone()
    }
}

impl LibraryRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Library, Self::Error> {
        match self.store.borrow().as_deref() {
            Some(json) => serde_json::from_str(json).map_err(|_| InMemoryError::Corrupt),
            None => Ok(Library::new()),
        }
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if self.refuse_writes.get() {
            return Err(InMemoryError::WriteRefused);
        }
        let json = serde_json::to_string(library).unwrap();
        *self.store.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// =============================================================================
// TestLibrary — テスト用Library作成ヘルパー
// =============================================================================

pub struct TestLibrary;

impl TestLibrary {
    /// 標準的なテスト用Library（4冊、うち既読1冊）:
    /// ```text
    /// 1. Dune by Frank Herbert (1965) - SciFi - Unread
    /// 2. Emma by Jane Austen (1815) - Classic - Read
    /// 3. Neuromancer by William Gibson (1984) - Cyberpunk - Unread
    /// 4. beloved by Toni Morrison (1987) - Literary - Unread
    /// ```
    pub fn standard() -> Library {
        let mut library = Library::new();
        for (title, author, year, genre, read) in [
            ("Dune", "Frank Herbert", 1965, "SciFi", false),
            ("Emma", "Jane Austen", 1815, "Classic", true),
            ("Neuromancer", "William Gibson", 1984, "Cyberpunk", false),
            ("beloved", "Toni Morrison", 1987, "Literary", false),
        ] {
            library.add_book(request(title, author, year, genre, read));
        }
        library
    }

    /// InMemoryRepoにLibraryを保存してLibraryServiceを返す。
    pub fn service_with(library: &Library) -> LibraryService<InMemoryRepo> {
        let repo = InMemoryRepo::new();
        repo.save(library).unwrap();
        LibraryService::new(repo)
    }
}

pub fn request(title: &str, author: &str, year: i32, genre: &str, read: bool) -> AddBookRequest {
    AddBookRequest {
        title: title.into(),
        author: author.into(),
        year,
        genre: genre.into(),
        read,
    }
}

pub fn titles(library: &Library) -> Vec<String> {
    library.books().iter().map(|b| b.title().to_string()).collect()
}

pub fn dune() -> Book {
    Book::new("Dune", "Herbert", 1965, "SciFi", false)
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
#[allow(dead_code)]
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
