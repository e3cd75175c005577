//! Balance HTTP handlers.
//!
//! This module implements the balance API endpoints:
//! - POST /balance/introduction - Credit a user, creating the account if needed
//! - POST /balance/debit - Remove money from a user
//! - POST /balance/transfer - Move money between two users
//! - GET /balance/get/{user_id} and GET /balance/get?user_id= - Current balance
//!
//! Extractor rejections (malformed JSON, missing fields, non-numeric ids) are
//! turned into `AppError::InvalidRequest` so every client error is a 400 with
//! the common error body.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{
    error::AppError,
    models::balance::{
        Balance, DebitRequest, IntroductionRequest, MessageResponse, TransferRequest, UserIdQuery,
    },
    services::BalanceService,
};

fn invalid(rejection: impl std::fmt::Display) -> AppError {
    AppError::InvalidRequest(rejection.to_string())
}

/// Credit a user ("introduction").
///
/// # Request Body
///
/// ```json
/// {
///   "user_id": 1,
///   "amount": 100.0
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: `{"message": "Introduction completed successfully"}`
/// - **400**: malformed body or non-positive amount
pub async fn introduction(
    State(service): State<BalanceService>,
    payload: Result<Json<IntroductionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(request) = payload.map_err(invalid)?;

    service.introduce(request.user_id, request.amount).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Introduction completed successfully")),
    ))
}

/// Debit a user.
///
/// # Response
///
/// - **200 OK**: `{"message": "Debit completed successfully"}`
/// - **400**: malformed body or non-positive amount
/// - **409**: insufficient funds
pub async fn debit(
    State(service): State<BalanceService>,
    payload: Result<Json<DebitRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = payload.map_err(invalid)?;

    service.debit(request.user_id, request.amount).await?;

    Ok(Json(MessageResponse::new("Debit completed successfully")))
}

/// Transfer money between users.
///
/// # Request Body
///
/// ```json
/// {
///   "from_user_id": 1,
///   "to_user_id": 2,
///   "amount": 60.0
/// }
/// ```
///
/// # Atomicity
///
/// Both balances change in a single store transaction, or neither does.
pub async fn transfer(
    State(service): State<BalanceService>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = payload.map_err(invalid)?;

    service
        .transfer(request.from_user_id, request.to_user_id, request.amount)
        .await?;

    Ok(Json(MessageResponse::new("Transfer completed successfully")))
}

/// Get a user's balance by path parameter.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "user_id": 1,
///   "balance": 40.0
/// }
/// ```
///
/// Returns 404 when the user has never been credited.
pub async fn get_balance(
    State(service): State<BalanceService>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Balance>, AppError> {
    let Path(user_id) = user_id.map_err(invalid)?;

    Ok(Json(service.get_balance(user_id).await?))
}

/// Get a user's balance by `user_id` query parameter.
pub async fn get_balance_by_query(
    State(service): State<BalanceService>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<Balance>, AppError> {
    let Query(query) = query.map_err(invalid)?;

    Ok(Json(service.get_balance(query.user_id).await?))
}
