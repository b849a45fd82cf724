//! Amortized loan payment calculator
//!
//! All arithmetic is done in `Decimal` so the figures shown on a confirmation
//! screen and the figures persisted with an application are bit-for-bit equal.
//! Monetary results are rounded to cents using round-half-away-from-zero.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use thiserror::Error;

use super::model::{LoanQuote, Schedule};

/// Smallest principal accepted for an application
pub const MIN_AMOUNT: i32 = 500;
/// Largest principal accepted for an application
pub const MAX_AMOUNT: i32 = 3000;
/// Shortest repayment term in months
pub const MIN_DURATION: i32 = 3;
/// Longest repayment term in months
pub const MAX_DURATION: i32 = 12;
/// Nominal annual rate used when none is configured
pub const DEFAULT_ANNUAL_RATE: Decimal = dec!(0.05);

const MONEY_DP: u32 = 2;
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Calculator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("amount must be between {min} and {max}, got {got}")]
    AmountOutOfBounds { min: i32, max: i32, got: i32 },

    #[error("duration must be between {min} and {max} months, got {got}")]
    DurationOutOfBounds { min: i32, max: i32, got: i32 },

    #[error("invalid calculator input: {0}")]
    InvalidInput(String),

    #[error("arithmetic overflow while computing schedule")]
    Overflow,
}

/// Fixed-rate amortization calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanCalculator {
    annual_rate: Decimal,
}

impl Default for LoanCalculator {
    fn default() -> Self {
        Self {
            annual_rate: DEFAULT_ANNUAL_RATE,
        }
    }
}

impl LoanCalculator {
    /// Create a calculator for the given nominal annual rate (0.05 = 5%)
    pub fn new(annual_rate: Decimal) -> Result<Self, QuoteError> {
        if annual_rate.is_sign_negative() && !annual_rate.is_zero() {
            return Err(QuoteError::InvalidInput(format!(
                "annual rate must not be negative, got {}",
                annual_rate
            )));
        }
        Ok(Self { annual_rate })
    }

    pub fn annual_rate(&self) -> Decimal {
        self.annual_rate
    }

    /// Compute the periodic payment and total repayment for a loan.
    ///
    /// Only mathematical validity is checked here (positive principal, at
    /// least one period). Business bounds belong to [`LoanCalculator::quote`].
    pub fn compute_schedule(
        &self,
        principal: Decimal,
        term_months: u32,
    ) -> Result<Schedule, QuoteError> {
        if principal <= Decimal::ZERO {
            return Err(QuoteError::InvalidInput(format!(
                "principal must be positive, got {}",
                principal
            )));
        }
        if term_months == 0 {
            return Err(QuoteError::InvalidInput(
                "term must be at least one month".to_string(),
            ));
        }

        let periods = Decimal::from(term_months);
        let rate = self.annual_rate / MONTHS_PER_YEAR;

        let raw_payment = if rate.is_zero() {
            principal / periods
        } else {
            let growth = compound_factor(Decimal::ONE + rate, term_months)?;
            let numerator = principal
                .checked_mul(rate)
                .and_then(|v| v.checked_mul(growth))
                .ok_or(QuoteError::Overflow)?;
            numerator
                .checked_div(growth - Decimal::ONE)
                .ok_or(QuoteError::Overflow)?
        };

        let periodic_payment = round_money(raw_payment);
        let total_repayment = periodic_payment
            .checked_mul(periods)
            .ok_or(QuoteError::Overflow)?;

        Ok(Schedule {
            periodic_payment,
            total_repayment,
        })
    }

    /// Bounds-checked quote for the public calculator and application intake
    pub fn quote(&self, amount: i32, duration: i32) -> Result<LoanQuote, QuoteError> {
        check_bounds(amount, duration)?;

        // Bounds above guarantee both values are positive.
        let schedule = self.compute_schedule(Decimal::from(amount), duration as u32)?;

        Ok(LoanQuote {
            amount,
            duration,
            monthly_payment: schedule.periodic_payment,
            total_cost: schedule.total_repayment,
            interest_rate: self.annual_rate,
        })
    }
}

/// Reject amounts and durations outside the product range
pub fn check_bounds(amount: i32, duration: i32) -> Result<(), QuoteError> {
    if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
        return Err(QuoteError::AmountOutOfBounds {
            min: MIN_AMOUNT,
            max: MAX_AMOUNT,
            got: amount,
        });
    }
    if !(MIN_DURATION..=MAX_DURATION).contains(&duration) {
        return Err(QuoteError::DurationOutOfBounds {
            min: MIN_DURATION,
            max: MAX_DURATION,
            got: duration,
        });
    }
    Ok(())
}

fn compound_factor(base: Decimal, periods: u32) -> Result<Decimal, QuoteError> {
    (0..periods).try_fold(Decimal::ONE, |acc, _| {
        acc.checked_mul(base).ok_or(QuoteError::Overflow)
    })
}

fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DP);
    rounded
}
