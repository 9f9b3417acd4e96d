//! Figures for the dashboard and the report pages, computed from the live
//! collections.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::circulation::{days_late, fine_for};
use crate::library::Library;
use crate::model::{Book, BookId, MemberId, TransactionId};
use crate::store::KeyHasher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_books: usize,
    pub available_books: usize,
    pub active_members: usize,
    pub overdue_books: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueLoan {
    pub transaction_id: TransactionId,
    pub book_id: BookId,
    pub title: String,
    pub member_id: MemberId,
    pub member_name: String,
    pub due_date: DateTime<Utc>,
    pub days_overdue: u64,
    /// What the fine would be if the book came back right now.
    pub accrued_fine: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpaidFine {
    pub transaction_id: TransactionId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub fine: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingFines {
    pub fines: Vec<UnpaidFine>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCount {
    pub book: Book,
    pub issue_count: usize,
}

impl Library {
    pub fn dashboard(&self) -> DashboardStats {
        let now = self.now();
        DashboardStats {
            total_books: self.store.books.len(),
            available_books: self.store.books.iter().filter(|b| b.available).count(),
            active_members: self.store.members.iter().filter(|m| m.active).count(),
            overdue_books: self
                .store
                .transactions
                .iter()
                .filter(|t| t.is_overdue_at(now))
                .count(),
        }
    }

    /// Open loans past their due date, most overdue first.
    pub fn overdue_loans(&self) -> Vec<OverdueLoan> {
        let now = self.now();
        let mut overdue: Vec<OverdueLoan> = self
            .store
            .transactions
            .iter()
            .filter(|t| t.is_overdue_at(now))
            .map(|t| OverdueLoan {
                transaction_id: t.id,
                book_id: t.book_id,
                title: self.book(t.book_id).map(|b| b.title.clone()).unwrap_or_default(),
                member_id: t.member_id,
                member_name: self.member(t.member_id).map(|m| m.name.clone()).unwrap_or_default(),
                due_date: t.due_date,
                days_overdue: days_late(t.due_date, now),
                accrued_fine: fine_for(t.due_date, now),
            })
            .collect();
        overdue.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));
        overdue
    }

    /// Returned loans whose fine has not been paid yet.
    pub fn outstanding_fines(&self) -> OutstandingFines {
        let fines: Vec<UnpaidFine> = self
            .store
            .transactions
            .iter()
            .filter(|t| !t.is_open() && t.fine > 0 && !t.fine_paid)
            .map(|t| UnpaidFine {
                transaction_id: t.id,
                book_id: t.book_id,
                member_id: t.member_id,
                fine: t.fine,
            })
            .collect();
        let total = fines.iter().map(|f| f.fine).sum();
        OutstandingFines { fines, total }
    }

    /// Books ranked by how often they were issued. Books never issued are
    /// left out; ties keep catalog order.
    pub fn most_issued(&self, limit: usize) -> Vec<IssueCount> {
        let mut counts: HashMap<BookId, usize, KeyHasher> = HashMap::default();
        for transaction in &self.store.transactions {
            *counts.entry(transaction.book_id).or_insert(0) += 1;
        }
        let mut ranked: Vec<IssueCount> = self
            .store
            .books
            .iter()
            .filter_map(|book| {
                counts.get(&book.id).map(|&issue_count| IssueCount {
                    book: book.clone(),
                    issue_count,
                })
            })
            .collect();
        // stable, so ties stay in catalog order
        ranked.sort_by(|a, b| b.issue_count.cmp(&a.issue_count));
        ranked.truncate(limit);
        ranked
    }
}
