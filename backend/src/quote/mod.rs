//! Loan quote domain module
//!
//! Pure payment calculator shared by the quote endpoint and application intake.

mod calculator;
mod model;

pub use calculator::{
    check_bounds, LoanCalculator, QuoteError, DEFAULT_ANNUAL_RATE, MAX_AMOUNT, MAX_DURATION,
    MIN_AMOUNT, MIN_DURATION,
};
pub use model::{LoanQuote, QuoteRequest, Schedule};
