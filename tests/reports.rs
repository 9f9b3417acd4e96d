use bookworm::Library;
use bookworm::clock::ManualClock;
use bookworm::model::{BookId, MemberId, MembershipType, NewMember, TransactionId};
use bookworm::reports::DashboardStats;
use bookworm::store::SequenceGenerator;
use chrono::{DateTime, TimeZone, Utc};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn library_at(now: DateTime<Utc>) -> (Library, ManualClock) {
    let clock = ManualClock::new(now);
    let library =
        Library::seeded_with(Box::new(SequenceGenerator::new()), Box::new(clock.clone()))
            .expect("seeded library");
    (library, clock)
}

#[test]
fn dashboard_counts_the_seed() {
    let (library, _) = library_at(at(2023, 11, 20));
    assert_eq!(
        library.dashboard(),
        DashboardStats {
            total_books: 4,
            available_books: 3,
            active_members: 1,
            overdue_books: 1,
        }
    );
    let (early, _) = library_at(at(2023, 11, 10));
    assert_eq!(early.dashboard().overdue_books, 0);
}

#[test]
fn overdue_loans_are_ranked_most_overdue_first() {
    let (mut library, clock) = library_at(at(2023, 11, 20));
    library
        .issue_book(BookId(1), MemberId(1), at(2023, 11, 22), "")
        .expect("issue");
    clock.set(at(2023, 11, 26));
    let overdue = library.overdue_loans();
    let ids: Vec<_> = overdue.iter().map(|o| o.transaction_id).collect();
    assert_eq!(ids, [TransactionId(1), TransactionId(5)]);
    // due 2023-11-16 00:00, now 2023-11-26 12:00
    assert_eq!(overdue[0].days_overdue, 11);
    assert_eq!(overdue[0].accrued_fine, 55);
    assert_eq!(overdue[0].title, "The Great Gatsby");
    assert_eq!(overdue[0].member_name, "John Doe");
    assert_eq!(overdue[1].days_overdue, 4);
}

#[test]
fn outstanding_fines_total_unpaid_returns() {
    let (mut library, _) = library_at(at(2023, 11, 20));
    assert_eq!(library.outstanding_fines().total, 0);
    library
        .return_book(TransactionId(1), at(2023, 11, 19))
        .expect("return");
    let fines = library.outstanding_fines();
    assert_eq!(fines.fines.len(), 1);
    assert_eq!(fines.fines[0].fine, 20);
    assert_eq!(fines.total, 20);
    library.pay_fine(TransactionId(1)).expect("pay");
    assert!(library.outstanding_fines().fines.is_empty());
}

#[test]
fn most_issued_ranks_books_by_loans() {
    let (mut library, _) = library_at(at(2023, 11, 20));
    let member = library
        .add_member(NewMember::new("M40001", "Barbara", MembershipType::OneYear))
        .expect("add")
        .id;
    for _ in 0..2 {
        let loan = library
            .issue_book(BookId(2), member, at(2023, 11, 25), "")
            .expect("issue");
        library.return_book(loan.id, at(2023, 11, 21)).expect("return");
    }
    let loan = library
        .issue_book(BookId(4), member, at(2023, 11, 25), "")
        .expect("issue");
    library.return_book(loan.id, at(2023, 11, 21)).expect("return");

    let ranked: Vec<_> = library
        .most_issued(10)
        .into_iter()
        .map(|c| (c.book.id, c.issue_count))
        .collect();
    // books 3 and 4 tie and keep catalog order; book 1 was never issued
    assert_eq!(ranked, [(BookId(2), 2), (BookId(3), 1), (BookId(4), 1)]);
    assert_eq!(library.most_issued(1).len(), 1);
}
