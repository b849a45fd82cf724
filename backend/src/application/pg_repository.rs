//! PostgreSQL-backed application repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::RepositoryError;
use super::model::LoanApplication;
use super::repository::ApplicationRepository;

/// Repository over the `loan_applications` table
#[derive(Clone)]
pub struct PgApplicationRepository {
    db_pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db_pool
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn insert(
        &self,
        application: LoanApplication,
    ) -> Result<LoanApplication, RepositoryError> {
        let stored = sqlx::query_as::<_, LoanApplication>(
            r#"
            INSERT INTO loan_applications (
                id, user_id, amount, duration, purpose, monthly_payment, total_cost,
                first_name, last_name, email, phone, date_of_birth,
                employment_status, monthly_income, monthly_expenses,
                terms_accepted, credit_check_accepted, marketing_accepted,
                status, current_step, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22
            )
            RETURNING *
            "#,
        )
        .bind(application.id)
        .bind(application.user_id)
        .bind(application.amount)
        .bind(application.duration)
        .bind(application.purpose)
        .bind(application.monthly_payment)
        .bind(application.total_cost)
        .bind(&application.first_name)
        .bind(&application.last_name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(application.date_of_birth)
        .bind(application.employment_status)
        .bind(application.monthly_income)
        .bind(application.monthly_expenses)
        .bind(application.terms_accepted)
        .bind(application.credit_check_accepted)
        .bind(application.marketing_accepted)
        .bind(application.status)
        .bind(application.current_step)
        .bind(application.created_at)
        .bind(application.updated_at)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<Option<LoanApplication>, RepositoryError> {
        let application =
            sqlx::query_as::<_, LoanApplication>("SELECT * FROM loan_applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db_pool)
                .await?;

        Ok(application)
    }

    async fn list_all(&self) -> Result<Vec<LoanApplication>, RepositoryError> {
        let applications = sqlx::query_as::<_, LoanApplication>(
            "SELECT * FROM loan_applications ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(applications)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<LoanApplication>, RepositoryError> {
        let applications = sqlx::query_as::<_, LoanApplication>(
            "SELECT * FROM loan_applications WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(applications)
    }

    async fn update(
        &self,
        application: &LoanApplication,
    ) -> Result<Option<LoanApplication>, RepositoryError> {
        let updated = sqlx::query_as::<_, LoanApplication>(
            r#"
            UPDATE loan_applications SET
                status = $2,
                current_step = $3,
                step1_completed_at = $4,
                step2_completed_at = $5,
                step3_completed_at = $6,
                step4_completed_at = $7,
                step5_completed_at = $8,
                step6_completed_at = $9,
                step7_completed_at = $10,
                lender_id = $11,
                lender_name = $12,
                lender_response = $13,
                lender_message = $14,
                account_number = $15,
                updated_at = $16
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(application.id)
        .bind(application.status)
        .bind(application.current_step)
        .bind(application.step1_completed_at)
        .bind(application.step2_completed_at)
        .bind(application.step3_completed_at)
        .bind(application.step4_completed_at)
        .bind(application.step5_completed_at)
        .bind(application.step6_completed_at)
        .bind(application.step7_completed_at)
        .bind(&application.lender_id)
        .bind(&application.lender_name)
        .bind(application.lender_response)
        .bind(&application.lender_message)
        .bind(&application.account_number)
        .bind(application.updated_at)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(updated)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        crate::db::check_health(&self.db_pool)
            .await
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))
    }
}
