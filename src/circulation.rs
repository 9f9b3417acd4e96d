//! Circulation: issuing books, taking them back, fines.
//!
//! A transaction moves through
//!
//! ```text
//! Open --return on time--> ReturnedNoFine
//! Open --return late-----> ReturnedWithFineUnpaid --pay--> ReturnedWithFinePaid
//! ```
//!
//! A book only goes back into circulation when its transaction reaches one of
//! the two terminal states. Every precondition is checked before anything is
//! written, so a rejected call leaves the store exactly as it was.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::error::{BookwormError, Result};
use crate::library::Library;
use crate::model::{BookId, MemberId, ReturnReceipt, Transaction, TransactionId};
use crate::notify::Notice;

/// Currency units charged per started day of lateness. There is no cap.
pub const FINE_PER_DAY: u64 = 5;
/// Longest loan, in days from the moment of issue.
pub const MAX_LOAN_DAYS: i64 = 15;

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Started days between the due date and the return; zero when on time.
pub fn days_late(due: DateTime<Utc>, returned: DateTime<Utc>) -> u64 {
    if returned <= due {
        return 0;
    }
    let millis = u64::try_from((returned - due).num_milliseconds()).unwrap_or(u64::MAX);
    millis.div_ceil(MILLIS_PER_DAY)
}

/// The fine owed for returning at `returned` something due at `due`.
pub fn fine_for(due: DateTime<Utc>, returned: DateTime<Utc>) -> u64 {
    days_late(due, returned).saturating_mul(FINE_PER_DAY)
}

impl Library {
    /// Lends a book to a member until `due_date`.
    ///
    /// Refused when either party is unknown, the book is out, the membership
    /// is inactive, or the due date is before now or more than
    /// [`MAX_LOAN_DAYS`] days ahead.
    pub fn issue_book(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
        due_date: DateTime<Utc>,
        remarks: &str,
    ) -> Result<Transaction> {
        let Some(book) = self.store.books.get(&book_id) else {
            return self.reject(BookwormError::BookNotFound(book_id));
        };
        let Some(member) = self.store.members.get(&member_id) else {
            return self.reject(BookwormError::MemberNotFound(member_id));
        };
        // a paid fine frees the flag even while a loan is still open
        if !book.available || self.open_transaction_for_book(book_id).is_some() {
            return self.reject(BookwormError::BookUnavailable(book_id));
        }
        if !member.active {
            return self.reject(BookwormError::MembershipInactive(member_id));
        }
        let issue_date = self.now();
        if due_date < issue_date {
            return self.reject(BookwormError::Validation(
                "Return date cannot be earlier than issue date".to_string(),
            ));
        }
        if due_date > issue_date + Duration::days(MAX_LOAN_DAYS) {
            return self.reject(BookwormError::Validation(format!(
                "Return date cannot be more than {MAX_LOAN_DAYS} days from issue date"
            )));
        }

        let transaction = Transaction {
            id: TransactionId(self.store.generate_id()),
            book_id,
            member_id,
            issue_date,
            due_date,
            returned_at: None,
            fine: 0,
            fine_paid: false,
            remarks: remarks.to_string(),
        };
        let (kept, _) = self.store.transactions.keep(transaction);
        let transaction = kept.clone();
        self.set_availability(book_id, false);
        info!(transaction = %transaction.id, book = %book_id, member = %member_id, due = %due_date, "book issued");
        self.notify(Notice::success("Book issued successfully"));
        Ok(transaction)
    }

    /// Closes an open transaction. The fine is fixed here and never
    /// recomputed. A book returned with a fine stays out of circulation until
    /// the fine is paid.
    pub fn return_book(
        &mut self,
        transaction_id: TransactionId,
        returned_at: DateTime<Utc>,
    ) -> Result<ReturnReceipt> {
        let Some(transaction) = self.store.transactions.get(&transaction_id) else {
            return self.reject(BookwormError::TransactionNotFound(transaction_id));
        };
        if !transaction.is_open() {
            return self.reject(BookwormError::AlreadyReturned(transaction_id));
        }
        let fine = fine_for(transaction.due_date, returned_at);
        let book_id = transaction.book_id;

        let state = match self.store.transactions.get_mut(&transaction_id) {
            Some(transaction) => {
                transaction.returned_at = Some(returned_at);
                transaction.fine = fine;
                transaction.state()
            }
            None => return self.reject(BookwormError::TransactionNotFound(transaction_id)),
        };
        if fine == 0 {
            self.set_availability(book_id, true);
            info!(transaction = %transaction_id, book = %book_id, "book returned");
            self.notify(Notice::success("Book returned successfully"));
        } else {
            warn!(transaction = %transaction_id, book = %book_id, fine, "book returned late");
            self.notify(Notice::warning(format!("Book returned with a fine of ${fine}")));
        }
        Ok(ReturnReceipt { transaction_id, fine, state })
    }

    /// Marks the fine as paid and puts the book back into circulation. Paying
    /// twice, or paying a zero fine, is harmless.
    pub fn pay_fine(&mut self, transaction_id: TransactionId) -> Result<Transaction> {
        let transaction = match self.store.transactions.get_mut(&transaction_id) {
            Some(transaction) => {
                transaction.fine_paid = true;
                transaction.clone()
            }
            None => return self.reject(BookwormError::TransactionNotFound(transaction_id)),
        };
        self.set_availability(transaction.book_id, true);
        info!(transaction = %transaction_id, book = %transaction.book_id, fine = transaction.fine, "fine paid");
        self.notify(Notice::success("Fine paid and book returned successfully"));
        Ok(transaction)
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.store.transactions.get(&id)
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.store.transactions.iter()
    }

    pub fn book_transactions(&self, book_id: BookId) -> Vec<&Transaction> {
        self.store
            .transactions
            .iter()
            .filter(|t| t.book_id == book_id)
            .collect()
    }

    pub fn member_transactions(&self, member_id: MemberId) -> Vec<&Transaction> {
        self.store
            .transactions
            .iter()
            .filter(|t| t.member_id == member_id)
            .collect()
    }

    pub fn open_transactions(&self) -> Vec<&Transaction> {
        self.store.transactions.iter().filter(|t| t.is_open()).collect()
    }

    /// The loan a book is currently out on, if any.
    pub fn open_transaction_for_book(&self, book_id: BookId) -> Option<&Transaction> {
        self.store
            .transactions
            .iter()
            .find(|t| t.book_id == book_id && t.is_open())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn on_time_or_early_is_free() {
        assert_eq!(fine_for(due(), due()), 0);
        assert_eq!(fine_for(due(), due() - Duration::days(9)), 0);
    }

    #[test]
    fn whole_days_are_charged_per_day() {
        assert_eq!(fine_for(due(), due() + Duration::days(3)), 15);
        assert_eq!(fine_for(due(), due() + Duration::days(20)), 100);
    }

    #[test]
    fn partial_days_round_up() {
        assert_eq!(fine_for(due(), due() + Duration::hours(60)), 15);
        assert_eq!(fine_for(due(), due() + Duration::milliseconds(1)), 5);
        assert_eq!(days_late(due(), due() + Duration::hours(24)), 1);
    }
}
