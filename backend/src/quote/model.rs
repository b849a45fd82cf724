use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Periodic payment and total repayment for a principal/term pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub periodic_payment: Decimal,
    pub total_repayment: Decimal,
}

/// Quote returned by the public calculator endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanQuote {
    pub amount: i32,
    pub duration: i32,
    pub monthly_payment: Decimal,
    pub total_cost: Decimal,
    /// Nominal annual rate as a fraction (0.05 = 5%)
    pub interest_rate: Decimal,
}

/// Query / body for a quote request
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuoteRequest {
    pub amount: i32,
    pub duration: i32,
}
