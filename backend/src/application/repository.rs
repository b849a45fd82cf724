//! Storage abstraction for loan applications

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::RepositoryError;
use super::model::LoanApplication;

/// Repository for application persistence.
///
/// `update` must write every mutable column of the record in a single atomic
/// statement; concurrent writers race at last-write-wins granularity.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persist a newly created application
    async fn insert(&self, application: LoanApplication)
        -> Result<LoanApplication, RepositoryError>;

    /// Find an application by ID
    async fn get(&self, id: Uuid) -> Result<Option<LoanApplication>, RepositoryError>;

    /// All applications, newest first
    async fn list_all(&self) -> Result<Vec<LoanApplication>, RepositoryError>;

    /// Applications submitted by one user, newest first
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<LoanApplication>, RepositoryError>;

    /// Overwrite the lifecycle columns of an existing application.
    /// Returns `None` if the record no longer exists.
    async fn update(
        &self,
        application: &LoanApplication,
    ) -> Result<Option<LoanApplication>, RepositoryError>;

    /// Storage liveness probe for health checks
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Process-local repository used when no database is configured, and in tests
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    records: RwLock<HashMap<Uuid, LoanApplication>>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn newest_first(mut items: Vec<LoanApplication>) -> Vec<LoanApplication> {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    items
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn insert(
        &self,
        application: LoanApplication,
    ) -> Result<LoanApplication, RepositoryError> {
        let mut records = self.records.write().await;
        if records.contains_key(&application.id) {
            return Err(RepositoryError::Unavailable(format!(
                "duplicate application id {}",
                application.id
            )));
        }
        records.insert(application.id, application.clone());
        Ok(application)
    }

    async fn get(&self, id: Uuid) -> Result<Option<LoanApplication>, RepositoryError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<LoanApplication>, RepositoryError> {
        let items = self.records.read().await.values().cloned().collect();
        Ok(newest_first(items))
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<LoanApplication>, RepositoryError> {
        let items = self
            .records
            .read()
            .await
            .values()
            .filter(|app| app.user_id == Some(user_id))
            .cloned()
            .collect();
        Ok(newest_first(items))
    }

    async fn update(
        &self,
        application: &LoanApplication,
    ) -> Result<Option<LoanApplication>, RepositoryError> {
        let mut records = self.records.write().await;
        match records.get_mut(&application.id) {
            Some(stored) => {
                stored.status = application.status;
                stored.current_step = application.current_step;
                stored.step1_completed_at = application.step1_completed_at;
                stored.step2_completed_at = application.step2_completed_at;
                stored.step3_completed_at = application.step3_completed_at;
                stored.step4_completed_at = application.step4_completed_at;
                stored.step5_completed_at = application.step5_completed_at;
                stored.step6_completed_at = application.step6_completed_at;
                stored.step7_completed_at = application.step7_completed_at;
                stored.lender_id = application.lender_id.clone();
                stored.lender_name = application.lender_name.clone();
                stored.lender_response = application.lender_response;
                stored.lender_message = application.lender_message.clone();
                stored.account_number = application.account_number.clone();
                stored.updated_at = application.updated_at;
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }
}
