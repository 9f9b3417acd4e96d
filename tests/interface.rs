use std::sync::Arc;
use std::thread;

use bookworm::clock::ManualClock;
use bookworm::interface::LibraryInterface;
use bookworm::model::{BookKind, NewBook};
use bookworm::store::SequenceGenerator;
use bookworm::{BookwormError, Library};
use chrono::{TimeZone, Utc};

fn interface() -> LibraryInterface {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    let library = Library::seeded_with(Box::new(SequenceGenerator::new()), Box::new(clock))
        .expect("seeded library");
    LibraryInterface::new(library)
}

#[test]
fn concurrent_writers_get_distinct_ids() {
    let shared = Arc::new(interface());
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                shared
                    .write(|lib| {
                        let serial = format!("BK-{n}");
                        Ok(lib.add_book(NewBook::new("Copy", "Anon", BookKind::Book, &serial)).id)
                    })
                    .expect("write")
            })
        })
        .collect();
    let mut ids: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("join").get())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (5..13).collect::<Vec<_>>());
    let library = Arc::try_unwrap(shared).expect("sole owner").into_inner().expect("lock");
    assert_eq!(library.books().count(), 12);
}

#[test]
fn write_errors_pass_through() {
    let shared = interface();
    let err = shared
        .write(|lib| lib.pay_fine(bookworm::model::TransactionId(40)))
        .unwrap_err();
    assert!(matches!(err, BookwormError::TransactionNotFound(_)));
    // a failed write leaves the lock usable
    assert_eq!(shared.read(|lib| lib.books().count()).expect("read"), 4);
}
