//! Loan quote handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};

use crate::error::ApiResult;
use crate::quote::{LoanCalculator, LoanQuote, QuoteRequest};

/// Quote from query parameters: `GET /api/quote?amount=1500&duration=6`
pub async fn get_quote(
    State(calculator): State<LoanCalculator>,
    query: Result<Query<QuoteRequest>, QueryRejection>,
) -> ApiResult<Json<LoanQuote>> {
    let Query(request) = query?;
    Ok(Json(calculator.quote(request.amount, request.duration)?))
}

/// Quote from a JSON body
pub async fn post_quote(
    State(calculator): State<LoanCalculator>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> ApiResult<Json<LoanQuote>> {
    let Json(request) = payload?;
    Ok(Json(calculator.quote(request.amount, request.duration)?))
}
