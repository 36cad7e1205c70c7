//! API Routes
//!
//! HTTP endpoint definitions for the transaction lifecycle.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{OperationContext, Transaction};
use crate::error::{AppError, AppResult};
use crate::handlers::{CreateTransactionCommand, PageRequest};

use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

/// Body of `POST /transactions`.
///
/// Absent fields fall through to domain validation, so a missing amount is
/// reported the same way as a zero one. Any client-supplied owner is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub transaction_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateTransactionRequest> for CreateTransactionCommand {
    fn from(request: CreateTransactionRequest) -> Self {
        let command =
            CreateTransactionCommand::new(request.amount, request.currency, request.transaction_type);
        match request.description {
            Some(description) => command.with_description(description),
            None => command,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Query string shared by the list endpoints.
///
/// Values are kept as text so that junk like `?page=abc` degrades to the
/// defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(lenient_int(&self.page), lenient_int(&self.page_size))
    }
}

fn lenient_int(raw: &Option<String>) -> i64 {
    raw.as_deref()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: &'static str,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub data: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub page: i64,
    pub page_size: i64,
}

impl PageResponse {
    fn new(data: Vec<Transaction>, page: PageRequest) -> Self {
        Self {
            data,
            status: None,
            page: page.page,
            page_size: page.page_size,
        }
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/my", get(list_my_transactions))
        .route("/transactions/status", get(list_transactions_by_status))
        .route("/transactions/:id", get(get_transaction))
        .route("/transactions/:id/status", patch(update_transaction_status))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidArgument(rejection.body_text()))
}

fn transaction_id(path: Result<Path<Uuid>, PathRejection>) -> AppResult<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::InvalidArgument("invalid transaction ID".to_string()))
}

fn list_query(query: Result<Query<ListQuery>, QueryRejection>) -> AppResult<ListQuery> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| AppError::InvalidArgument(rejection.body_text()))
}

// =========================================================================
// POST /transactions
// =========================================================================

async fn create_transaction(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MessageResponse<Transaction>>)> {
    let request = body(payload)?;

    let transaction = state.transactions.create(request.into(), &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "transaction created successfully",
            data: transaction,
        }),
    ))
}

// =========================================================================
// GET /transactions/:id
// =========================================================================

async fn get_transaction(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<DataResponse<Transaction>>> {
    let id = transaction_id(path)?;
    let transaction = state.transactions.get(id).await?;
    Ok(Json(DataResponse { data: transaction }))
}

// =========================================================================
// GET /transactions/my
// =========================================================================

async fn list_my_transactions(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<PageResponse>> {
    let page = list_query(query)?.page_request();
    let transactions = state.transactions.list_for_user(&context, page).await?;
    Ok(Json(PageResponse::new(transactions, page)))
}

// =========================================================================
// GET /transactions
// =========================================================================

async fn list_transactions(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<PageResponse>> {
    let page = list_query(query)?.page_request();
    let transactions = state.transactions.list_all(page).await?;
    Ok(Json(PageResponse::new(transactions, page)))
}

// =========================================================================
// GET /transactions/status?status=
// =========================================================================

async fn list_transactions_by_status(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<PageResponse>> {
    let query = list_query(query)?;
    let status = query
        .status
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidArgument("status parameter is required".to_string()))?;
    let page = query.page_request();

    let transactions = state.transactions.list_by_status(&status, page).await?;

    Ok(Json(PageResponse {
        status: Some(status),
        ..PageResponse::new(transactions, page)
    }))
}

// =========================================================================
// PATCH /transactions/:id/status
// =========================================================================

async fn update_transaction_status(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse<Transaction>>> {
    let id = transaction_id(path)?;
    let request = body(payload)?;

    let transaction = state
        .transactions
        .update_status(id, &request.status, &context)
        .await?;

    Ok(Json(MessageResponse {
        message: "transaction status updated successfully",
        data: transaction,
    }))
}
