//! Interactive text menu
//!
//! stdin/stdout <-> domain::Library (loaded once, saved on exit)

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::application::error::AppError;
use crate::application::export::ExportService;
use crate::application::service::LibraryService;
use crate::config::Config;
use crate::domain::model::book::{AddBookRequest, UpdateBookRequest};
use crate::domain::model::library::{Library, SearchField, SortKey};
use crate::domain::repository::LibraryRepository;
use crate::infra::json_store::JsonLibraryRepository;

// =============================================================================
// Public entry point
// =============================================================================

/// 標準入出力で対話メニューを起動する。
pub fn run(config: &Config) -> anyhow::Result<()> {
    let service = LibraryService::new(JsonLibraryRepository::new(&config.library_path));
    let library = service.load()?;
    let stdin = io::stdin();
    let menu = Menu::new(
        service,
        library,
        config.export_path.clone(),
        stdin.lock(),
        io::stdout(),
    );
    menu.run()?;
    Ok(())
}

const MENU_TEXT: &str = "\nMenu\n\
1. Add a book\n\
2. Remove a book\n\
3. Update book details\n\
4. Mark book as read/unread\n\
5. Search for a book\n\
6. Display all books\n\
7. Sort books\n\
8. Display statistics\n\
9. Export books\n\
10. Exit\n";

/// 1アクション後の制御
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
    /// 入力が尽きた。保存を試みてから終了する。
    EndOfInput,
}

// =============================================================================
// Menu
// =============================================================================

pub struct Menu<S: LibraryRepository, R: BufRead, W: Write> {
    service: LibraryService<S>,
    library: Library,
    export_path: PathBuf,
    input: R,
    output: W,
}

impl<S: LibraryRepository, R: BufRead, W: Write> Menu<S, R, W> {
    pub fn new(
        service: LibraryService<S>,
        library: Library,
        export_path: PathBuf,
        input: R,
        output: W,
    ) -> Self {
        Self {
            service,
            library,
            export_path,
            input,
            output,
        }
    }

    /// メニューループ。終了時のLibraryを返す。
    pub fn run(mut self) -> io::Result<Library> {
        loop {
            self.output.write_all(MENU_TEXT.as_bytes())?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                self.save_and_exit()?;
                break;
            };

            let flow = match choice.as_str() {
                "1" => self.add_book()?,
                "2" => self.remove_book()?,
                "3" => self.update_book()?,
                "4" => self.mark_book_status()?,
                "5" => self.search_books()?,
                "6" => self.display_books()?,
                "7" => self.sort_books()?,
                "8" => self.display_statistics()?,
                "9" => self.export_books()?,
                "10" => self.save_and_exit()?,
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };

            match flow {
                Flow::Continue => {}
                Flow::Exit => break,
                Flow::EndOfInput => {
                    self.save_and_exit()?;
                    break;
                }
            }
        }
        self.output.flush()?;
        Ok(self.library)
    }

    // --- actions ---

    fn add_book(&mut self) -> io::Result<Flow> {
        let fields = [
            "Enter the book title: ",
            "Enter the author: ",
            "Enter the publication year: ",
            "Enter the genre: ",
            "Have you read this book? (yes/no): ",
        ];
        let Some([title, author, year, genre, read]) = self.prompt_all(fields)? else {
            return Ok(Flow::EndOfInput);
        };

        let read = read.to_lowercase() == "yes";
        match AddBookRequest::from_input(&title, &author, &year, &genre, read) {
            Ok(req) => {
                let book = self.library.add_book(req);
                tracing::debug!(title = book.title(), "book added");
                writeln!(self.output, "Book added successfully!")?;
            }
            Err(e) => self.report(&e.into())?,
        }
        Ok(Flow::Continue)
    }

    fn remove_book(&mut self) -> io::Result<Flow> {
        let Some(title) = self.prompt("Enter the title of the book to remove: ")? else {
            return Ok(Flow::EndOfInput);
        };
        match self.library.remove_book(&title) {
            Ok(book) => {
                tracing::debug!(title = book.title(), "book removed");
                writeln!(self.output, "Book removed successfully!")?;
            }
            Err(e) => self.report(&e.into())?,
        }
        Ok(Flow::Continue)
    }

    fn update_book(&mut self) -> io::Result<Flow> {
        let Some(title) = self.prompt("Enter the title of the book to update: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(book) = self.library.find(&title) else {
            writeln!(self.output, "Book not found.")?;
            return Ok(Flow::Continue);
        };
        writeln!(self.output, "Updating {} by {}", book.title(), book.author())?;

        let fields = [
            "New title (leave blank to keep current): ",
            "New author (leave blank to keep current): ",
            "New publication year (leave blank to keep current): ",
            "New genre (leave blank to keep current): ",
        ];
        let Some([new_title, author, year, genre]) = self.prompt_all(fields)? else {
            return Ok(Flow::EndOfInput);
        };

        let result = UpdateBookRequest::from_input(&new_title, &author, &year, &genre)
            .and_then(|req| self.library.update_book(&title, req).map(|_| ()));
        match result {
            Ok(()) => writeln!(self.output, "Book updated successfully!")?,
            Err(e) => self.report(&e.into())?,
        }
        Ok(Flow::Continue)
    }

    fn mark_book_status(&mut self) -> io::Result<Flow> {
        let Some(title) = self.prompt("Enter the title of the book to mark as read/unread: ")?
        else {
            return Ok(Flow::EndOfInput);
        };
        match self.library.toggle_read(&title) {
            Ok(status) => writeln!(self.output, "Book marked as {status}.")?,
            Err(e) => self.report(&e.into())?,
        }
        Ok(Flow::Continue)
    }

    fn search_books(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "Search by:\n1. Title\n2. Author")?;
        let Some(choice) = self.prompt("Enter your choice: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let field = match choice.as_str() {
            "1" => SearchField::Title,
            "2" => SearchField::Author,
            _ => {
                writeln!(self.output, "Invalid choice!")?;
                return Ok(Flow::Continue);
            }
        };
        let label = match field {
            SearchField::Title => "title",
            SearchField::Author => "author",
        };
        let Some(query) = self.prompt(&format!("Enter the {label}: "))? else {
            return Ok(Flow::EndOfInput);
        };

        let results = self.library.search(field, &query);
        if results.is_empty() {
            writeln!(self.output, "No matching books found.")?;
        } else {
            for book in results {
                writeln!(self.output, "{book}")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn display_books(&mut self) -> io::Result<Flow> {
        if self.library.is_empty() {
            writeln!(self.output, "Your library is empty.")?;
        } else {
            let listing = ExportService::render_listing(self.library.books());
            self.output.write_all(listing.as_bytes())?;
        }
        Ok(Flow::Continue)
    }

    fn sort_books(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "Sort by:\n1. Title\n2. Author\n3. Year")?;
        let Some(choice) = self.prompt("Enter your choice: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let key = match choice.as_str() {
            "1" => SortKey::Title,
            "2" => SortKey::Author,
            "3" => SortKey::Year,
            _ => {
                writeln!(self.output, "Invalid choice!")?;
                return Ok(Flow::Continue);
            }
        };
        self.library.sort_by(key);
        writeln!(self.output, "Books sorted successfully!")?;
        Ok(Flow::Continue)
    }

    fn display_statistics(&mut self) -> io::Result<Flow> {
        let text = ExportService::render_statistics(&self.library.statistics());
        self.output.write_all(text.as_bytes())?;
        Ok(Flow::Continue)
    }

    fn export_books(&mut self) -> io::Result<Flow> {
        match ExportService::export(&self.library, &self.export_path) {
            Ok(_) => writeln!(self.output, "Library exported successfully!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn save_and_exit(&mut self) -> io::Result<Flow> {
        match self.service.save(&self.library) {
            Ok(()) => {
                writeln!(self.output, "Library saved to file. Goodbye!")?;
                Ok(Flow::Exit)
            }
            Err(e) => {
                self.report(&e)?;
                Ok(Flow::Continue)
            }
        }
    }

    // --- I/O helpers ---

    /// プロンプトを表示して1行読む。入力終端ならNone。
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        self.output.write_all(message.as_bytes())?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_all<const N: usize>(
        &mut self,
        messages: [&str; N],
    ) -> io::Result<Option<[String; N]>> {
        let mut answers: [String; N] = std::array::from_fn(|_| String::new());
        for (answer, message) in answers.iter_mut().zip(messages) {
            match self.prompt(message)? {
                Some(line) => *answer = line,
                None => return Ok(None),
            }
        }
        Ok(Some(answers))
    }

    fn report(&mut self, error: &AppError) -> io::Result<()> {
        if error.is_not_found() {
            writeln!(self.output, "Book not found.")
        } else {
            writeln!(self.output, "Error: {error}")
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
