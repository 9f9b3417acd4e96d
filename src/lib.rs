//! Bookworm – the in-memory core of a small library's circulation desk.
//!
//! A [`Library`] owns three collections, kept by a [`store::Store`]:
//! * [`model::Book`]s, the catalog. Books are never deleted.
//! * [`model::Member`]s, each with a membership type that decides when the
//!   membership expires.
//! * [`model::Transaction`]s, one per loan. A transaction is *open* until the
//!   book comes back, at which point its fine is fixed.
//!
//! Identifiers come from an injected [`store::IdGenerator`] and time from an
//! injected [`clock::Clock`], so both can be controlled in tests.
//!
//! ## Modules
//! * [`catalog`] – add, update, search and look up books.
//! * [`membership`] – enrol, edit, extend, cancel, expire and delete members.
//! * [`circulation`] – issue, return and pay fines. Returning late costs
//!   [`circulation::FINE_PER_DAY`] per started day, and the book stays out of
//!   circulation until the fine is paid.
//! * [`reports`] – dashboard figures, overdue loans, unpaid fines.
//! * [`notify`] – the user-facing notices every operation emits.
//! * [`interface`] and [`server`] – shared access and the JSON-over-HTTP
//!   surface used by the `bookworm` binary.
//!
//! Nothing is persisted: a restart goes back to the seed data.
//!
//! ## Quick Start
//! ```
//! use chrono::{Duration, Utc};
//! use bookworm::{Library, model::{BookId, MemberId, TransactionId}};
//! let mut library = Library::seeded().unwrap();
//! // the seed data has "The Great Gatsby" (book 3) out on loan 1
//! assert!(library.issue_book(BookId(3), MemberId(1), Utc::now(), "").is_err());
//! let due = library.transaction(TransactionId(1)).unwrap().due_date;
//! let receipt = library.return_book(TransactionId(1), due + Duration::days(20)).unwrap();
//! assert_eq!(receipt.fine, 100);
//! assert!(!library.book(BookId(3)).unwrap().available);
//! library.pay_fine(TransactionId(1)).unwrap();
//! assert!(library.book(BookId(3)).unwrap().available);
//! ```

pub mod catalog;
pub mod circulation;
pub mod clock;
pub mod config;
pub mod error;
pub mod interface;
pub mod library;
pub mod membership;
pub mod model;
pub mod notify;
pub mod reports;
pub mod seed;
pub mod server;
pub mod store;

pub use error::{BookwormError, ErrorKind, Result};
pub use library::Library;
