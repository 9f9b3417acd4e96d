use std::hint::black_box;

use bookworm::clock::{Clock, ManualClock};
use bookworm::model::{BookKind, MembershipType, NewBook, NewMember};
use bookworm::store::{SequenceGenerator, Store};
use bookworm::Library;
use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};

const AUTHORS: [&str; 5] = [
    "Harper Lee",
    "George Orwell",
    "Ursula K. Le Guin",
    "Octavia Butler",
    "Italo Calvino",
];

fn large_catalog(size: usize) -> (Library, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap());
    let mut library = Library::new(
        Store::new(Box::new(SequenceGenerator::new())),
        Box::new(clock.clone()),
    );
    for n in 0..size {
        let kind = if n % 7 == 0 { BookKind::Movie } else { BookKind::Book };
        library.add_book(
            NewBook::new(&format!("Volume {n}"), AUTHORS[n % AUTHORS.len()], kind, &format!("BK-{n:06}"))
                .shelved_at(&format!("S{}", n % 40))
                .published(1900 + (n % 120) as i32),
        );
    }
    (library, clock)
}

fn search(c: &mut Criterion) {
    let (library, _) = large_catalog(20_000);
    c.bench_function("search_books author 20k", |b| {
        b.iter(|| library.search_books(black_box("butler")).len())
    });
    c.bench_function("search_books serial 20k", |b| {
        b.iter(|| library.search_books(black_box("bk-019999")).len())
    });
}

fn circulation(c: &mut Criterion) {
    let (mut library, clock) = large_catalog(1_000);
    let member = library
        .add_member(NewMember::new("M1", "Reader", MembershipType::TwoYears))
        .expect("member")
        .id;
    let books: Vec<_> = library.books().map(|b| b.id).collect();
    let mut next = 0;
    c.bench_function("issue and return", |b| {
        b.iter(|| {
            let book = books[next % books.len()];
            next += 1;
            let due = clock.now() + Duration::days(7);
            let loan = library
                .issue_book(book, member, due, "")
                .expect("issue");
            library
                .return_book(loan.id, due - Duration::hours(1))
                .expect("return")
        })
    });
    c.bench_function("dashboard after many loans", |b| b.iter(|| library.dashboard()));
}

criterion_group!(benches, search, circulation);
criterion_main!(benches);
