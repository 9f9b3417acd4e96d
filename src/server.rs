use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::catalog::BookFilter;
use crate::error::{BookwormError, ErrorKind};
use crate::interface::LibraryInterface;
use crate::model::{
    Book, BookId, BookKind, BookUpdate, Member, MemberId, MemberUpdate, NewBook, NewMember, ReturnReceipt,
    Transaction, TransactionId,
};
use crate::reports::{DashboardStats, IssueCount, OutstandingFines, OverdueLoan};

type Shared = Arc<LibraryInterface>;
type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Serialize)]
pub struct ErrorBody {
    pub status: String,
    pub error: String,
}

/// Carries a library error out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub BookwormError);

impl From<BookwormError> for ApiError {
    fn from(e: BookwormError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PreconditionFailed => StatusCode::CONFLICT,
            ErrorKind::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let msg = self.0.to_string();
        warn!(%msg, code = %status.as_u16(), "request failed");
        let body = ErrorBody { status: "error".into(), error: msg };
        (status, Json(body)).into_response()
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub kind: Option<BookKind>,
    #[serde(default)]
    pub available: bool,
}

#[derive(Deserialize)]
pub struct MemberParams {
    pub number: Option<String>,
}

#[derive(Deserialize)]
pub struct TransactionParams {
    #[serde(default)]
    pub open: bool,
}

#[derive(Deserialize)]
pub struct PopularParams {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub returned_at: DateTime<Utc>,
}

pub fn router(interface: Shared) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/v1/books", get(search_books).post(add_book))
        .route("/v1/books/available", get(available_books))
        .route("/v1/books/:id", get(get_book).patch(update_book))
        .route("/v1/books/:id/transactions", get(book_transactions))
        .route("/v1/members", get(find_members).post(add_member))
        .route("/v1/members/expire", post(expire_memberships))
        .route("/v1/members/:id", get(get_member).patch(update_member).delete(delete_member))
        .route("/v1/members/:id/transactions", get(member_transactions))
        .route("/v1/transactions", get(list_transactions).post(issue_book))
        .route("/v1/transactions/:id", get(get_transaction))
        .route("/v1/transactions/:id/return", post(return_book))
        .route("/v1/transactions/:id/pay", post(pay_fine))
        .route("/v1/reports/dashboard", get(dashboard))
        .route("/v1/reports/overdue", get(overdue_loans))
        .route("/v1/reports/fines", get(outstanding_fines))
        .route("/v1/reports/popular", get(most_issued))
        .layer(cors)
        .with_state(interface)
}

/// Binds the listener and serves until the process is stopped.
pub async fn serve(interface: Shared, listen_address: &str) -> crate::error::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_address).await?;
    info!(address = %listen_address, "listening");
    axum::serve(listener, router(interface)).await?;
    Ok(())
}

// ------------- Catalog -------------
async fn search_books(
    State(iface): State<Shared>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<Book>> {
    let query = params.q.unwrap_or_default();
    let filter = BookFilter {
        kind: params.kind,
        only_available: params.available,
    };
    let books: Vec<Book> =
        iface.read(|lib| lib.search_books_with(&query, &filter).into_iter().cloned().collect())?;
    Ok(Json(books))
}

async fn add_book(State(iface): State<Shared>, Json(new_book): Json<NewBook>) -> ApiResult<Book> {
    Ok(Json(iface.write(|lib| Ok(lib.add_book(new_book)))?))
}

async fn available_books(State(iface): State<Shared>) -> ApiResult<Vec<Book>> {
    let books: Vec<Book> = iface.read(|lib| lib.available_books().into_iter().cloned().collect())?;
    Ok(Json(books))
}

async fn get_book(State(iface): State<Shared>, Path(id): Path<BookId>) -> ApiResult<Book> {
    let book = iface.read(|lib| lib.book(id).cloned())?;
    Ok(Json(book.ok_or(BookwormError::BookNotFound(id))?))
}

async fn update_book(
    State(iface): State<Shared>,
    Path(id): Path<BookId>,
    Json(updates): Json<Vec<BookUpdate>>,
) -> ApiResult<Book> {
    let book = iface.write(|lib| Ok(lib.update_book(id, updates)))?;
    Ok(Json(book.ok_or(BookwormError::BookNotFound(id))?))
}

async fn book_transactions(
    State(iface): State<Shared>,
    Path(id): Path<BookId>,
) -> ApiResult<Vec<Transaction>> {
    let transactions: Vec<Transaction> = iface.read(|lib| lib.book_transactions(id).into_iter().cloned().collect())?;
    Ok(Json(transactions))
}

// ------------- Membership -------------
async fn find_members(
    State(iface): State<Shared>,
    Query(params): Query<MemberParams>,
) -> ApiResult<Vec<Member>> {
    let members: Vec<Member> = iface.read(|lib| match &params.number {
        Some(number) => lib.find_member_by_number(number).cloned().into_iter().collect(),
        None => lib.members().cloned().collect(),
    })?;
    Ok(Json(members))
}

async fn add_member(
    State(iface): State<Shared>,
    Json(new_member): Json<NewMember>,
) -> ApiResult<Member> {
    Ok(Json(iface.write(|lib| lib.add_member(new_member))?))
}

async fn expire_memberships(State(iface): State<Shared>) -> ApiResult<Vec<MemberId>> {
    Ok(Json(iface.write(|lib| Ok(lib.expire_memberships()))?))
}

async fn get_member(State(iface): State<Shared>, Path(id): Path<MemberId>) -> ApiResult<Member> {
    let member = iface.read(|lib| lib.member(id).cloned())?;
    Ok(Json(member.ok_or(BookwormError::MemberNotFound(id))?))
}

async fn update_member(
    State(iface): State<Shared>,
    Path(id): Path<MemberId>,
    Json(updates): Json<Vec<MemberUpdate>>,
) -> ApiResult<Member> {
    let member = iface.write(|lib| lib.update_member(id, updates))?;
    Ok(Json(member.ok_or(BookwormError::MemberNotFound(id))?))
}

async fn delete_member(State(iface): State<Shared>, Path(id): Path<MemberId>) -> ApiResult<Member> {
    Ok(Json(iface.write(|lib| lib.delete_member(id))?))
}

async fn member_transactions(
    State(iface): State<Shared>,
    Path(id): Path<MemberId>,
) -> ApiResult<Vec<Transaction>> {
    let transactions: Vec<Transaction> =
        iface.read(|lib| lib.member_transactions(id).into_iter().cloned().collect())?;
    Ok(Json(transactions))
}

// ------------- Circulation -------------
async fn list_transactions(
    State(iface): State<Shared>,
    Query(params): Query<TransactionParams>,
) -> ApiResult<Vec<Transaction>> {
    let transactions: Vec<Transaction> = iface.read(|lib| {
        if params.open {
            lib.open_transactions().into_iter().cloned().collect()
        } else {
            lib.transactions().cloned().collect()
        }
    })?;
    Ok(Json(transactions))
}

async fn issue_book(
    State(iface): State<Shared>,
    Json(req): Json<IssueRequest>,
) -> ApiResult<Transaction> {
    let transaction =
        iface.write(|lib| lib.issue_book(req.book_id, req.member_id, req.due_date, &req.remarks))?;
    Ok(Json(transaction))
}

async fn get_transaction(
    State(iface): State<Shared>,
    Path(id): Path<TransactionId>,
) -> ApiResult<Transaction> {
    let transaction = iface.read(|lib| lib.transaction(id).cloned())?;
    Ok(Json(transaction.ok_or(BookwormError::TransactionNotFound(id))?))
}

async fn return_book(
    State(iface): State<Shared>,
    Path(id): Path<TransactionId>,
    Json(req): Json<ReturnRequest>,
) -> ApiResult<ReturnReceipt> {
    Ok(Json(iface.write(|lib| lib.return_book(id, req.returned_at))?))
}

async fn pay_fine(
    State(iface): State<Shared>,
    Path(id): Path<TransactionId>,
) -> ApiResult<Transaction> {
    Ok(Json(iface.write(|lib| lib.pay_fine(id))?))
}

// ------------- Reports -------------
async fn dashboard(State(iface): State<Shared>) -> ApiResult<DashboardStats> {
    Ok(Json(iface.read(|lib| lib.dashboard())?))
}

async fn overdue_loans(State(iface): State<Shared>) -> ApiResult<Vec<OverdueLoan>> {
    Ok(Json(iface.read(|lib| lib.overdue_loans())?))
}

async fn outstanding_fines(State(iface): State<Shared>) -> ApiResult<OutstandingFines> {
    Ok(Json(iface.read(|lib| lib.outstanding_fines())?))
}

async fn most_issued(
    State(iface): State<Shared>,
    Query(params): Query<PopularParams>,
) -> ApiResult<Vec<IssueCount>> {
    let limit = params.limit.unwrap_or(5);
    Ok(Json(iface.read(|lib| lib.most_issued(limit))?))
}
