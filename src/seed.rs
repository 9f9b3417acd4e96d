//! The demonstration data a fresh library starts with.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{BookwormError, Result};
use crate::model::{
    Book, BookId, BookKind, Member, MemberId, MembershipType, Transaction, TransactionId,
};
use crate::store::Store;

fn date(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| BookwormError::Invariant(format!("bad seed date {year}-{month}-{day}")))
}

#[allow(clippy::too_many_arguments)]
fn book(
    id: u64,
    title: &str,
    author: &str,
    kind: BookKind,
    serial_number: &str,
    available: bool,
    shelf_location: &str,
    publication_year: i32,
) -> Book {
    Book {
        id: BookId(id),
        title: title.to_string(),
        author: author.to_string(),
        kind,
        serial_number: serial_number.to_string(),
        available,
        shelf_location: shelf_location.to_string(),
        publication_year,
    }
}

pub fn books() -> Vec<Book> {
    vec![
        book(1, "To Kill a Mockingbird", "Harper Lee", BookKind::Book, "BK-1001", true, "A1", 1960),
        book(2, "1984", "George Orwell", BookKind::Book, "BK-1002", true, "A2", 1949),
        book(3, "The Great Gatsby", "F. Scott Fitzgerald", BookKind::Book, "BK-1003", false, "A3", 1925),
        book(4, "Inception", "Christopher Nolan", BookKind::Movie, "MV-101", true, "M1", 2010),
    ]
}

pub fn members() -> Result<Vec<Member>> {
    Ok(vec![
        Member {
            id: MemberId(1),
            membership_number: "M10001".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "123-456-7890".to_string(),
            address: "123 Main St".to_string(),
            membership_type: MembershipType::OneYear,
            join_date: date(2023, 1, 1)?,
            expiry_date: date(2024, 1, 1)?,
            active: true,
        },
        Member {
            id: MemberId(2),
            membership_number: "M10002".to_string(),
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            phone: "123-456-7891".to_string(),
            address: "456 Elm St".to_string(),
            membership_type: MembershipType::SixMonths,
            join_date: date(2023, 6, 1)?,
            expiry_date: date(2023, 12, 1)?,
            active: false,
        },
    ])
}

pub fn transactions() -> Result<Vec<Transaction>> {
    Ok(vec![Transaction {
        id: TransactionId(1),
        book_id: BookId(3),
        member_id: MemberId(1),
        issue_date: date(2023, 11, 1)?,
        due_date: date(2023, 11, 16)?,
        returned_at: None,
        fine: 0,
        fine_paid: false,
        remarks: "First borrowing".to_string(),
    }])
}

impl Store {
    /// A store holding the seed collections. The generator is told about
    /// every seeded id so new entities never collide with them.
    pub fn seeded(id_generator: Box<dyn crate::store::IdGenerator>) -> Result<Self> {
        let mut store = Store::new(id_generator);
        for book in books() {
            store.retain_id(book.id.get());
            store.books.keep(book);
        }
        for member in members()? {
            store.retain_id(member.id.get());
            store.members.keep(member);
        }
        for transaction in transactions()? {
            store.retain_id(transaction.id.get());
            store.transactions.keep(transaction);
        }
        Ok(store)
    }
}
