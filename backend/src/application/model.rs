//! Loan application models and data structures

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use super::error::ApplicationError;

/// Highest processing step; reaching it completes the application
pub const FINAL_STEP: i32 = 7;

/// Loan application record
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub id: Uuid,
    pub user_id: Option<Uuid>,

    // Loan terms, fixed at creation
    pub amount: i32,
    pub duration: i32,
    pub purpose: LoanPurpose,
    pub monthly_payment: Decimal,
    pub total_cost: Decimal,

    // Applicant
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub employment_status: EmploymentStatus,
    pub monthly_income: IncomeBracket,
    pub monthly_expenses: Option<i64>,

    // Consents
    pub terms_accepted: bool,
    pub credit_check_accepted: bool,
    pub marketing_accepted: bool,

    // Lifecycle
    pub status: ApplicationStatus,
    pub current_step: i32,
    pub step1_completed_at: Option<DateTime<Utc>>,
    pub step2_completed_at: Option<DateTime<Utc>>,
    pub step3_completed_at: Option<DateTime<Utc>>,
    pub step4_completed_at: Option<DateTime<Utc>>,
    pub step5_completed_at: Option<DateTime<Utc>>,
    pub step6_completed_at: Option<DateTime<Utc>>,
    pub step7_completed_at: Option<DateTime<Utc>>,
    pub lender_id: Option<String>,
    pub lender_name: Option<String>,
    pub lender_response: Option<LenderResponse>,
    pub lender_message: Option<String>,
    pub account_number: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoanApplication {
    /// Completion timestamp of a processing step
    pub fn step_completed_at(&self, step: ProcessingStep) -> Option<DateTime<Utc>> {
        *self.step_slot(step)
    }

    fn step_slot(&self, step: ProcessingStep) -> &Option<DateTime<Utc>> {
        match step.get() {
            1 => &self.step1_completed_at,
            2 => &self.step2_completed_at,
            3 => &self.step3_completed_at,
            4 => &self.step4_completed_at,
            5 => &self.step5_completed_at,
            6 => &self.step6_completed_at,
            _ => &self.step7_completed_at,
        }
    }

    fn step_slot_mut(&mut self, step: ProcessingStep) -> &mut Option<DateTime<Utc>> {
        match step.get() {
            1 => &mut self.step1_completed_at,
            2 => &mut self.step2_completed_at,
            3 => &mut self.step3_completed_at,
            4 => &mut self.step4_completed_at,
            5 => &mut self.step5_completed_at,
            6 => &mut self.step6_completed_at,
            _ => &mut self.step7_completed_at,
        }
    }

    /// Move the record to `step`.
    ///
    /// A step's completion timestamp is written once; re-entering a step keeps
    /// the original time. Stepping back to a step that was skipped leaves it
    /// unstamped, so stamps stay non-decreasing in step order. Completed
    /// applications accept no further steps.
    pub fn advance_to(
        &mut self,
        step: ProcessingStep,
        now: DateTime<Utc>,
    ) -> Result<(), ApplicationError> {
        self.ensure_open()?;

        let later_stamped = (step.get() + 1..=FINAL_STEP)
            .filter_map(|n| ProcessingStep::new(n).ok())
            .any(|later| self.step_slot(later).is_some());

        self.current_step = step.get();
        self.status = ApplicationStatus::for_step(step);
        if !later_stamped {
            self.step_slot_mut(step).get_or_insert(now);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Apply an operator status change; completed applications are final
    pub fn apply_status(
        &mut self,
        update: StatusUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), ApplicationError> {
        self.ensure_open()?;

        self.status = update.into();
        self.updated_at = now;
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), ApplicationError> {
        if self.status == ApplicationStatus::Completed {
            return Err(ApplicationError::InvalidArgument(format!(
                "application {} is already completed",
                self.id
            )));
        }
        Ok(())
    }
}

/// Application status
///
/// `step1`..`step7` follow administrative processing, `completed` is reached
/// only through step 7. `approved` / `rejected` are set by an operator.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq, Hash)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Step1,
    Step2,
    Step3,
    Step4,
    Step5,
    Step6,
    Step7,
    Completed,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Status label after advancing to `step`
    pub fn for_step(step: ProcessingStep) -> Self {
        match step.get() {
            1 => ApplicationStatus::Step1,
            2 => ApplicationStatus::Step2,
            3 => ApplicationStatus::Step3,
            4 => ApplicationStatus::Step4,
            5 => ApplicationStatus::Step5,
            6 => ApplicationStatus::Step6,
            _ => ApplicationStatus::Completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Step1 => "step1",
            ApplicationStatus::Step2 => "step2",
            ApplicationStatus::Step3 => "step3",
            ApplicationStatus::Step4 => "step4",
            ApplicationStatus::Step5 => "step5",
            ApplicationStatus::Step6 => "step6",
            ApplicationStatus::Step7 => "step7",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Statuses an operator may set directly
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusUpdate {
    Pending,
    Approved,
    Rejected,
}

impl StatusUpdate {
    pub fn parse(value: &str) -> Result<Self, ApplicationError> {
        match value {
            "pending" => Ok(StatusUpdate::Pending),
            "approved" => Ok(StatusUpdate::Approved),
            "rejected" => Ok(StatusUpdate::Rejected),
            other => Err(ApplicationError::InvalidArgument(format!(
                "status must be one of pending, approved, rejected; got '{}'",
                other
            ))),
        }
    }
}

impl From<StatusUpdate> for ApplicationStatus {
    fn from(update: StatusUpdate) -> Self {
        match update {
            StatusUpdate::Pending => ApplicationStatus::Pending,
            StatusUpdate::Approved => ApplicationStatus::Approved,
            StatusUpdate::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Lender decision
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "lender_response", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LenderResponse {
    Approved,
    Rejected,
}

impl LenderResponse {
    pub fn parse(value: &str) -> Result<Self, ApplicationError> {
        match value {
            "approved" => Ok(LenderResponse::Approved),
            "rejected" => Ok(LenderResponse::Rejected),
            other => Err(ApplicationError::InvalidArgument(format!(
                "response must be 'approved' or 'rejected', got '{}'",
                other
            ))),
        }
    }
}

/// Processing step number, always within 1..=7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProcessingStep(i32);

impl ProcessingStep {
    pub fn new(step: i32) -> Result<Self, ApplicationError> {
        if (1..=FINAL_STEP).contains(&step) {
            Ok(Self(step))
        } else {
            Err(ApplicationError::InvalidArgument(format!(
                "step must be between 1 and {}, got {}",
                FINAL_STEP, step
            )))
        }
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

/// Loan purpose
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "loan_purpose", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoanPurpose {
    Car,
    HomeImprovement,
    DebtConsolidation,
    Education,
    Travel,
    Medical,
    Other,
}

/// Applicant employment status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "employment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Student,
    Retired,
}

/// Net monthly income bracket
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "income_bracket")]
pub enum IncomeBracket {
    #[sqlx(rename = "under_1000")]
    #[serde(rename = "under_1000")]
    Under1000,
    #[sqlx(rename = "1000_2000")]
    #[serde(rename = "1000_2000")]
    From1000To2000,
    #[sqlx(rename = "2000_3000")]
    #[serde(rename = "2000_3000")]
    From2000To3000,
    #[sqlx(rename = "3000_5000")]
    #[serde(rename = "3000_5000")]
    From3000To5000,
    #[sqlx(rename = "over_5000")]
    #[serde(rename = "over_5000")]
    Over5000,
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request DTO for submitting an application
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    #[validate(range(min = 500, max = 3000, message = "amount must be between 500 and 3000"))]
    pub amount: i32,
    #[validate(range(min = 3, max = 12, message = "duration must be between 3 and 12 months"))]
    pub duration: i32,
    pub purpose: LoanPurpose,

    #[validate(length(min = 2, message = "first name must have at least 2 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, message = "last name must have at least 2 characters"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 10, message = "phone must have at least 10 characters"))]
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub employment_status: EmploymentStatus,
    pub monthly_income: IncomeBracket,
    #[validate(range(min = 0, message = "monthly expenses must not be negative"))]
    pub monthly_expenses: Option<i64>,

    pub terms_accepted: bool,
    pub credit_check_accepted: bool,
    #[serde(default)]
    pub marketing_accepted: bool,

    /// Client-side preview; the server recomputes and persists its own figures
    #[serde(default)]
    pub monthly_payment: Option<Decimal>,
    #[serde(default)]
    pub total_cost: Option<Decimal>,
}

impl CreateApplicationRequest {
    /// Copy with surrounding whitespace removed from free-text fields
    pub fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            ..self
        }
    }
}

/// Request DTO for advancing an application to a processing step
#[derive(Debug, Deserialize)]
pub struct AdvanceStepRequest {
    pub step: i32,
}

/// Request DTO for lender assignment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignLenderRequest {
    #[serde(default)]
    pub lender_id: Option<String>,
    #[serde(default)]
    pub lender_name: Option<String>,
}

/// Request DTO for a lender decision
#[derive(Debug, Deserialize)]
pub struct LenderResponseRequest {
    pub response: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request DTO for account number issuance
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountNumberRequest {
    #[serde(default)]
    pub account_number: Option<String>,
}

/// Request DTO for a direct status change
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// Query parameters for listing applications
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListApplicationsQuery {
    pub user_id: Option<Uuid>,
}
