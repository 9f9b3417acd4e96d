use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bookworm::clock::ManualClock;
use bookworm::interface::LibraryInterface;
use bookworm::model::{BookId, TransactionId};
use bookworm::server::router;
use bookworm::store::SequenceGenerator;
use bookworm::Library;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn interface() -> Arc<LibraryInterface> {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2023, 11, 20, 10, 0, 0).unwrap());
    let library = Library::seeded_with(Box::new(SequenceGenerator::new()), Box::new(clock))
        .expect("seeded library");
    Arc::new(LibraryInterface::new(library))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json")
    };
    (status, value)
}

#[tokio::test]
async fn search_returns_matching_books() {
    let app = router(interface());
    let (status, body) = send(app, "GET", "/v1/books?q=orwell", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));
    assert_eq!(body[0]["serialNumber"], "BK-1002");
    assert_eq!(body[0]["kind"], "book");
}

#[tokio::test]
async fn search_takes_kind_and_availability_filters() {
    let (_, movies) = send(router(interface()), "GET", "/v1/books?kind=movie", None).await;
    assert_eq!(movies.as_array().map(|a| a.len()), Some(1));
    assert_eq!(movies[0]["title"], "Inception");

    let (status, books) =
        send(router(interface()), "GET", "/v1/books?kind=book&available=true", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = books
        .as_array()
        .map(|a| a.iter().map(|b| b["id"].clone()).collect())
        .unwrap_or_default();
    assert_eq!(ids, [json!(1), json!(2)]);
}

#[tokio::test]
async fn unknown_book_is_404_with_error_body() {
    let app = router(interface());
    let (status, body) = send(app, "GET", "/v1/books/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"status": "error", "error": "Book not found: 99"}));
}

#[tokio::test]
async fn issuing_a_lent_book_is_a_conflict() {
    let app = router(interface());
    let request = json!({"bookId": 3, "memberId": 1, "dueDate": "2023-11-25T00:00:00Z"});
    let (status, body) = send(app, "POST", "/v1/transactions", Some(request)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "This book is not available for borrowing");
}

#[tokio::test]
async fn issue_over_http_updates_the_shared_library() {
    let shared = interface();
    let request = json!({
        "bookId": 1,
        "memberId": 1,
        "dueDate": "2023-11-30T00:00:00Z",
        "remarks": "over the counter"
    });
    let (status, body) =
        send(router(shared.clone()), "POST", "/v1/transactions", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 5);
    assert_eq!(body["returnedAt"], Value::Null);

    let available = shared
        .read(|lib| lib.book(BookId(1)).map(|b| b.available))
        .expect("read");
    assert_eq!(available, Some(false));
    let (_, open) = send(router(shared), "GET", "/v1/transactions?open=true", None).await;
    assert_eq!(open.as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn due_date_past_the_loan_period_is_unprocessable() {
    let app = router(interface());
    let request = json!({"bookId": 1, "memberId": 1, "dueDate": "2023-12-24T00:00:00Z"});
    let (status, _) = send(app, "POST", "/v1/transactions", Some(request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn return_then_pay_over_http() {
    let shared = interface();
    let (status, receipt) = send(
        router(shared.clone()),
        "POST",
        "/v1/transactions/1/return",
        Some(json!({"returnedAt": "2023-12-06T00:00:00Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["fine"], 100);
    assert_eq!(receipt["state"], "RETURNED_WITH_FINE_UNPAID");

    let (_, fines) = send(router(shared.clone()), "GET", "/v1/reports/fines", None).await;
    assert_eq!(fines["total"], 100);

    let (status, paid) =
        send(router(shared.clone()), "POST", "/v1/transactions/1/pay", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["finePaid"], true);
    let state = shared
        .read(|lib| lib.transaction(TransactionId(1)).map(|t| t.state()))
        .expect("read");
    assert!(state.is_some_and(|s| s.is_terminal()));
}

#[tokio::test]
async fn member_patch_takes_field_value_pairs() {
    let shared = interface();
    let (status, member) = send(
        router(shared.clone()),
        "PATCH",
        "/v1/members/2",
        Some(json!([{"field": "extend", "value": "1year"}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member["active"], true);
    assert_eq!(member["expiryDate"], "2024-12-01T00:00:00Z");

    let (status, _) = send(
        router(shared),
        "PATCH",
        "/v1/members/2",
        Some(json!([{"field": "membershipNumber", "value": "M10001"}])),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn dashboard_reports_the_seed() {
    let app = router(interface());
    let (status, body) = send(app, "GET", "/v1/reports/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"totalBooks": 4, "availableBooks": 3, "activeMembers": 1, "overdueBooks": 1})
    );
}
