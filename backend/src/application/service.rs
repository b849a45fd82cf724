//! Application lifecycle manager
//!
//! Owns the status/step state machine. Every call re-reads the record through
//! the repository and writes changes back in a single update; nothing is
//! cached between calls. Argument checks run before storage is touched.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::error::ApplicationError;
use super::model::{
    ApplicationStatus, CreateApplicationRequest, LenderResponse, LoanApplication,
    ProcessingStep, StatusUpdate,
};
use super::repository::ApplicationRepository;
use super::validation::validate_submission;
use crate::quote::LoanCalculator;

/// Lifecycle service for loan applications
#[derive(Clone)]
pub struct ApplicationService {
    repository: Arc<dyn ApplicationRepository>,
    calculator: LoanCalculator,
}

impl ApplicationService {
    pub fn new(repository: Arc<dyn ApplicationRepository>, calculator: LoanCalculator) -> Self {
        Self {
            repository,
            calculator,
        }
    }

    pub fn calculator(&self) -> &LoanCalculator {
        &self.calculator
    }

    pub fn repository(&self) -> &Arc<dyn ApplicationRepository> {
        &self.repository
    }

    /// Validate a submission, price it and store it as `pending`
    pub async fn create(
        &self,
        request: CreateApplicationRequest,
        owner: Option<Uuid>,
    ) -> Result<LoanApplication, ApplicationError> {
        let now = Utc::now();
        let request = request.trimmed();
        validate_submission(&request, now.date_naive()).map_err(ApplicationError::Validation)?;

        let schedule = self
            .calculator
            .compute_schedule(Decimal::from(request.amount), request.duration as u32)?;

        let application = LoanApplication {
            id: Uuid::new_v4(),
            user_id: owner,
            amount: request.amount,
            duration: request.duration,
            purpose: request.purpose,
            monthly_payment: schedule.periodic_payment,
            total_cost: schedule.total_repayment,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            date_of_birth: request.date_of_birth,
            employment_status: request.employment_status,
            monthly_income: request.monthly_income,
            monthly_expenses: request.monthly_expenses,
            terms_accepted: request.terms_accepted,
            credit_check_accepted: request.credit_check_accepted,
            marketing_accepted: request.marketing_accepted,
            status: ApplicationStatus::Pending,
            current_step: 0,
            step1_completed_at: None,
            step2_completed_at: None,
            step3_completed_at: None,
            step4_completed_at: None,
            step5_completed_at: None,
            step6_completed_at: None,
            step7_completed_at: None,
            lender_id: None,
            lender_name: None,
            lender_response: None,
            lender_message: None,
            account_number: None,
            created_at: now,
            updated_at: now,
        };

        Ok(self.repository.insert(application).await?)
    }

    /// Move an application to processing step 1..=7; step 7 completes it
    pub async fn advance_step(
        &self,
        id: Uuid,
        step: i32,
    ) -> Result<LoanApplication, ApplicationError> {
        let step = ProcessingStep::new(step)?;
        let mut application = self.load(id).await?;

        application.advance_to(step, Utc::now())?;
        self.store(application).await
    }

    /// Record which lender is handling the application
    pub async fn assign_lender(
        &self,
        id: Uuid,
        lender_id: &str,
        lender_name: &str,
    ) -> Result<LoanApplication, ApplicationError> {
        let lender_id = required("lenderId", lender_id)?;
        let lender_name = required("lenderName", lender_name)?;
        let mut application = self.load(id).await?;

        application.lender_id = Some(lender_id);
        application.lender_name = Some(lender_name);
        application.updated_at = Utc::now();
        self.store(application).await
    }

    /// Store the lender's decision. The application status is left as is.
    pub async fn record_lender_response(
        &self,
        id: Uuid,
        response: &str,
        message: Option<String>,
    ) -> Result<LoanApplication, ApplicationError> {
        let response = LenderResponse::parse(response)?;
        let message = message.filter(|m| !m.trim().is_empty());
        let mut application = self.load(id).await?;

        application.lender_response = Some(response);
        application.lender_message = message;
        application.updated_at = Utc::now();
        self.store(application).await
    }

    /// Attach the issued loan account number
    pub async fn set_account_number(
        &self,
        id: Uuid,
        account_number: &str,
    ) -> Result<LoanApplication, ApplicationError> {
        let account_number = required("accountNumber", account_number)?;
        let mut application = self.load(id).await?;

        application.account_number = Some(account_number);
        application.updated_at = Utc::now();
        self.store(application).await
    }

    /// Set the status to `pending`, `approved` or `rejected`.
    /// Completed applications are rejected.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<LoanApplication, ApplicationError> {
        let status = StatusUpdate::parse(status)?;
        let mut application = self.load(id).await?;

        application.apply_status(status, Utc::now())?;
        self.store(application).await
    }

    pub async fn get(&self, id: Uuid) -> Result<LoanApplication, ApplicationError> {
        self.load(id).await
    }

    pub async fn list_all(&self) -> Result<Vec<LoanApplication>, ApplicationError> {
        Ok(self.repository.list_all().await?)
    }

    pub async fn list_by_owner(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<LoanApplication>, ApplicationError> {
        Ok(self.repository.list_by_owner(user_id).await?)
    }

    async fn load(&self, id: Uuid) -> Result<LoanApplication, ApplicationError> {
        self.repository
            .get(id)
            .await?
            .ok_or(ApplicationError::NotFound(id))
    }

    async fn store(
        &self,
        application: LoanApplication,
    ) -> Result<LoanApplication, ApplicationError> {
        let id = application.id;
        self.repository
            .update(&application)
            .await?
            .ok_or(ApplicationError::NotFound(id))
    }
}

fn required(field: &str, value: &str) -> Result<String, ApplicationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApplicationError::InvalidArgument(format!(
            "{} is required",
            field
        )));
    }
    Ok(value.to_string())
}
