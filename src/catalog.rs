//! Book catalog operations.

use tracing::info;

use crate::library::Library;
use crate::model::{Book, BookId, BookKind, BookUpdate, NewBook};
use crate::notify::Notice;

/// Narrows a search. The default lets everything through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub kind: Option<BookKind>,
    pub only_available: bool,
}

impl BookFilter {
    pub fn kind(mut self, kind: BookKind) -> Self {
        self.kind = Some(kind);
        self
    }
    pub fn only_available(mut self) -> Self {
        self.only_available = true;
        self
    }
    pub fn admits(&self, book: &Book) -> bool {
        self.kind.is_none_or(|kind| book.kind == kind) && (!self.only_available || book.available)
    }
}

impl Library {
    /// Adds a book under a fresh id. Serial numbers are not checked for
    /// uniqueness; several copies may share one.
    pub fn add_book(&mut self, new_book: NewBook) -> Book {
        let id = BookId(self.store.generate_id());
        let (kept, _) = self.store.books.keep(new_book.into_book(id));
        let book = kept.clone();
        info!(book = %book.id, title = %book.title, "book added");
        self.notify(Notice::success(format!("Book \"{}\" added successfully", book.title)));
        book
    }

    /// Applies the updates in order. Returns the updated book, or `None`
    /// (and changes nothing) when the id is unknown.
    pub fn update_book(&mut self, id: BookId, updates: Vec<BookUpdate>) -> Option<Book> {
        let book = self.store.books.get_mut(&id)?;
        for update in updates {
            update.apply(book);
        }
        let book = book.clone();
        info!(book = %id, "book updated");
        self.notify(Notice::success("Book updated successfully"));
        Some(book)
    }

    /// Case-insensitive substring search over title, author and serial
    /// number, in catalog order. An empty query matches everything.
    pub fn search_books(&self, query: &str) -> Vec<&Book> {
        self.search_books_with(query, &BookFilter::default())
    }

    /// [`Library::search_books`], keeping only what the filter admits.
    pub fn search_books_with(&self, query: &str, filter: &BookFilter) -> Vec<&Book> {
        let query = query.to_lowercase();
        self.store
            .books
            .iter()
            .filter(|book| filter.admits(book))
            .filter(|book| {
                book.title.to_lowercase().contains(&query)
                    || book.author.to_lowercase().contains(&query)
                    || book.serial_number.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn available_books(&self) -> Vec<&Book> {
        self.store.books.iter().filter(|book| book.available).collect()
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.store.books.get(&id)
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.store.books.iter()
    }

    // Availability only moves with the circulation workflow.
    pub(crate) fn set_availability(&mut self, id: BookId, available: bool) {
        if let Some(book) = self.store.books.get_mut(&id) {
            book.available = available;
        }
    }
}
