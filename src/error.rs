use thiserror::Error;

use crate::model::{BookId, MemberId, TransactionId};

/// The three failure families a caller reacts to, plus everything that is
/// not the caller's fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PreconditionFailed,
    ValidationFailed,
    Internal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookwormError {
    #[error("Book not found: {0}")]
    BookNotFound(BookId),
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
    #[error("This book is not available for borrowing")]
    BookUnavailable(BookId),
    #[error("This member's membership is not active")]
    MembershipInactive(MemberId),
    #[error("This book has already been returned")]
    AlreadyReturned(TransactionId),
    #[error("Cannot delete member with active transactions ({open} open)")]
    OpenTransactions { member: MemberId, open: usize },
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
    #[error("Server error: {0}")]
    Server(String),
}

impl BookwormError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BookNotFound(_) | Self::MemberNotFound(_) | Self::TransactionNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::BookUnavailable(_)
            | Self::MembershipInactive(_)
            | Self::AlreadyReturned(_)
            | Self::OpenTransactions { .. } => ErrorKind::PreconditionFailed,
            Self::Validation(_) => ErrorKind::ValidationFailed,
            Self::Config(_) | Self::Lock(_) | Self::Invariant(_) | Self::Server(_) => {
                ErrorKind::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BookwormError>;

// Helper conversions
impl From<config::ConfigError> for BookwormError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
impl From<std::io::Error> for BookwormError {
    fn from(e: std::io::Error) -> Self {
        Self::Server(e.to_string())
    }
}
