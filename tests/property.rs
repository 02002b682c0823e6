//! Property-based tests — invariant verification with proptest.

mod common;

use common::{request, TestLibrary};
use proptest::prelude::*;

use book_shelf::domain::model::book::{parse_year, Book};
use book_shelf::domain::model::library::{Library, SearchField, SortKey, Statistics};
use book_shelf::domain::repository::LibraryRepository;
use book_shelf::infra::json_store::JsonLibraryRepository;

fn arb_book() -> impl Strategy<Value = Book> {
    (
        "[A-Za-z ]{1,12}",
        "[A-Za-z ]{1,12}",
        -3000i32..3000,
        "[A-Za-z]{1,8}",
        any::<bool>(),
    )
        .prop_map(|(title, author, year, genre, read)| Book::new(title, author, year, genre, read))
}

fn arb_library() -> impl Strategy<Value = Library> {
    prop::collection::vec(arb_book(), 0..12).prop_map(Library::from_books)
}

// =============================================================================
// Library invariants
// =============================================================================

proptest! {
    /// add_book → 末尾に同じレコード、件数+1。
    #[test]
    fn add_appends_equal_record(lib in arb_library(), book in arb_book()) {
        let mut lib = lib;
        let before = lib.len();
        lib.add_book(request(book.title(), book.author(), book.year(), book.genre(), book.is_read()));

        prop_assert_eq!(lib.len(), before + 1);
        prop_assert_eq!(lib.books().last(), Some(&book));
    }

    /// remove_book は最初の一致だけを削除し、他の順序を保つ。
    #[test]
    fn remove_deletes_only_first_match(lib in arb_library(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!lib.is_empty());
        let mut lib = lib;
        let target = lib.books()[pick.index(lib.len())].title().to_uppercase();
        let first = lib.books().iter().position(|b| b.title_matches(&target)).unwrap();

        let mut expected: Vec<Book> = lib.books().to_vec();
        let removed = expected.remove(first);

        prop_assert_eq!(lib.remove_book(&target).unwrap(), removed);
        prop_assert_eq!(lib.books(), expected.as_slice());
    }

    /// sort_by は冪等。
    #[test]
    fn sort_is_idempotent(lib in arb_library()) {
        for key in [SortKey::Title, SortKey::Author, SortKey::Year] {
            let mut once = lib.clone();
            once.sort_by(key);
            let mut twice = once.clone();
            twice.sort_by(key);
            prop_assert_eq!(once, twice);
        }
    }

    /// 同じキーの蔵書は元の相対順序を保つ（安定ソート）。
    #[test]
    fn sort_by_year_is_stable(lib in arb_library()) {
        let mut sorted = lib.clone();
        sorted.sort_by(SortKey::Year);

        let books = sorted.books();
        for pair in books.windows(2) {
            prop_assert!(pair[0].year() <= pair[1].year());
        }
        for year in books.iter().map(Book::year) {
            let original: Vec<&Book> = lib.books().iter().filter(|b| b.year() == year).collect();
            let after: Vec<&Book> = books.iter().filter(|b| b.year() == year).collect();
            prop_assert_eq!(original, after);
        }
    }

    /// search は元の順序を保つ部分列を返し、空クエリは全件一致。
    #[test]
    fn search_returns_ordered_subsequence(lib in arb_library(), query in "[a-z]{0,2}") {
        let found = lib.search(SearchField::Title, &query);
        let expected: Vec<&Book> = lib
            .books()
            .iter()
            .filter(|b| b.title().to_lowercase().contains(&query))
            .collect();
        prop_assert_eq!(&found, &expected);

        prop_assert_eq!(lib.search(SearchField::Author, "").len(), lib.len());
    }

    /// 統計値は0..=100の範囲、空ならEmpty。
    #[test]
    fn statistics_in_range(lib in arb_library()) {
        match lib.statistics() {
            Statistics::Empty => prop_assert!(lib.is_empty()),
            Statistics::Summary { total, read_count, read_percentage } => {
                prop_assert_eq!(total, lib.len());
                prop_assert!(read_count <= total);
                prop_assert!((0.0..=100.0).contains(&read_percentage));
            }
        }
    }

    /// 整数文字列は常にyearとして受理される。
    #[test]
    fn parse_year_accepts_integers(year in any::<i32>()) {
        prop_assert_eq!(parse_year(&year.to_string()).unwrap(), year);
    }

    /// 数字以外を含む文字列は拒否される。
    #[test]
    fn parse_year_rejects_words(s in "[a-z]{1,10}") {
        prop_assert!(parse_year(&s).is_err());
    }
}

// =============================================================================
// Persistence invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// save → load で同じ並びのLibraryが得られる。
    #[test]
    fn json_roundtrip(lib in arb_library()) {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonLibraryRepository::new(dir.path().join("library.json"));
        repo.save(&lib).unwrap();
        prop_assert_eq!(repo.load().unwrap(), lib);
    }

    /// 標準Libraryに追加した蔵書もラウンドトリップで残る。
    #[test]
    fn json_roundtrip_after_add(book in arb_book()) {
        let mut lib = TestLibrary::standard();
        lib.add_book(request(book.title(), book.author(), book.year(), book.genre(), book.is_read()));

        let dir = tempfile::tempdir().unwrap();
        let repo = JsonLibraryRepository::new(dir.path().join("library.json"));
        repo.save(&lib).unwrap();
        let loaded = repo.load().unwrap();
        prop_assert_eq!(loaded.books().last(), Some(&book));
    }
}
