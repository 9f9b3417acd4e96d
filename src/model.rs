//! Entities kept by the [`crate::store::Store`] and the requests that create
//! or change them.
//!
//! Identifiers are plain `u64` values wrapped in one newtype per collection so
//! that a member id can never be passed where a book id is expected. On the
//! wire they are bare numbers.

use std::fmt;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

// ------------- Identifiers -------------
pub type Ident = u64;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Ident);

        impl $name {
            pub fn get(self) -> Ident {
                self.0
            }
        }
        impl From<Ident> for $name {
            fn from(id: Ident) -> Self {
                Self(id)
            }
        }
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(
    /// Identifies a [`Book`] in the catalog.
    BookId
);
identifier!(
    /// Identifies a [`Member`].
    MemberId
);
identifier!(
    /// Identifies a circulation [`Transaction`].
    TransactionId
);

// ------------- Book -------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookKind {
    Book,
    Movie,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub kind: BookKind,
    pub serial_number: String,
    pub available: bool,
    pub shelf_location: String,
    pub publication_year: i32,
}

/// Everything needed to add a book; the catalog assigns the id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub kind: BookKind,
    pub serial_number: String,
    #[serde(default = "available_by_default")]
    pub available: bool,
    pub shelf_location: String,
    pub publication_year: i32,
}

fn available_by_default() -> bool {
    true
}

impl NewBook {
    pub fn new(title: &str, author: &str, kind: BookKind, serial_number: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            kind,
            serial_number: serial_number.to_string(),
            available: true,
            shelf_location: String::new(),
            publication_year: 0,
        }
    }
    pub fn shelved_at(mut self, shelf_location: &str) -> Self {
        self.shelf_location = shelf_location.to_string();
        self
    }
    pub fn published(mut self, publication_year: i32) -> Self {
        self.publication_year = publication_year;
        self
    }
    pub(crate) fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            kind: self.kind,
            serial_number: self.serial_number,
            available: self.available,
            shelf_location: self.shelf_location,
            publication_year: self.publication_year,
        }
    }
}

/// A single field-level change to a book. Availability is not one of them;
/// only circulation changes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum BookUpdate {
    Title(String),
    Author(String),
    Kind(BookKind),
    SerialNumber(String),
    ShelfLocation(String),
    PublicationYear(i32),
}

impl BookUpdate {
    pub(crate) fn apply(self, book: &mut Book) {
        match self {
            Self::Title(title) => book.title = title,
            Self::Author(author) => book.author = author,
            Self::Kind(kind) => book.kind = kind,
            Self::SerialNumber(serial_number) => book.serial_number = serial_number,
            Self::ShelfLocation(shelf_location) => book.shelf_location = shelf_location,
            Self::PublicationYear(year) => book.publication_year = year,
        }
    }
}

// ------------- Member -------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipType {
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "1year")]
    OneYear,
    #[serde(rename = "2years")]
    TwoYears,
}

impl MembershipType {
    /// Expiry of a brand new membership. Six months is counted as 182 days,
    /// the yearly tiers as calendar years.
    pub fn expiry_from_join(self, joined: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::SixMonths => joined.checked_add_signed(Duration::days(182)),
            Self::OneYear => joined.checked_add_months(Months::new(12)),
            Self::TwoYears => joined.checked_add_months(Months::new(24)),
        }
    }
    /// Expiry after extending an existing membership; every tier counts in
    /// calendar months here.
    pub fn extend(self, expiry: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months = match self {
            Self::SixMonths => 6,
            Self::OneYear => 12,
            Self::TwoYears => 24,
        };
        expiry.checked_add_months(Months::new(months))
    }
}

impl fmt::Display for MembershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SixMonths => "6 months",
            Self::OneYear => "1 year",
            Self::TwoYears => "2 years",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub membership_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub membership_type: MembershipType,
    pub join_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub membership_number: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub membership_type: MembershipType,
}

impl NewMember {
    pub fn new(membership_number: &str, name: &str, membership_type: MembershipType) -> Self {
        Self {
            membership_number: membership_number.to_string(),
            name: name.to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            membership_type,
        }
    }
    pub fn contact(mut self, email: &str, phone: &str, address: &str) -> Self {
        self.email = email.to_string();
        self.phone = phone.to_string();
        self.address = address.to_string();
        self
    }
}

/// A single change to a member. `Extend` and `Cancel` are the lifecycle
/// transitions; there is no way to set `active` or the expiry directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum MemberUpdate {
    Name(String),
    Email(String),
    Phone(String),
    Address(String),
    MembershipNumber(String),
    MembershipType(MembershipType),
    Extend(MembershipType),
    Cancel,
}

// ------------- Transaction -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub fine: u64,
    pub fine_paid: bool,
    pub remarks: String,
}

impl Transaction {
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
    pub fn state(&self) -> CirculationState {
        match (self.returned_at, self.fine, self.fine_paid) {
            (None, _, _) => CirculationState::Open,
            (Some(_), 0, _) => CirculationState::ReturnedNoFine,
            (Some(_), _, false) => CirculationState::ReturnedWithFineUnpaid,
            (Some(_), _, true) => CirculationState::ReturnedWithFinePaid,
        }
    }
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && now > self.due_date
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CirculationState {
    Open,
    ReturnedNoFine,
    ReturnedWithFineUnpaid,
    ReturnedWithFinePaid,
}

impl CirculationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ReturnedNoFine | Self::ReturnedWithFinePaid)
    }
}

/// Outcome of a successful return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnReceipt {
    pub transaction_id: TransactionId,
    pub fine: u64,
    pub state: CirculationState,
}
