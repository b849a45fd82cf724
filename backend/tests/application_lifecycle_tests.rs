//! Lifecycle manager tests against the in-memory repository

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

use loanapp_backend::application::{
    ApplicationError, ApplicationService, ApplicationStatus, CreateApplicationRequest,
    EmploymentStatus, InMemoryApplicationRepository, IncomeBracket, LenderResponse, LoanPurpose,
    ProcessingStep,
};
use loanapp_backend::quote::LoanCalculator;

/// Helper to build a service over a fresh repository
fn setup() -> (ApplicationService, Arc<InMemoryApplicationRepository>) {
    let repository = Arc::new(InMemoryApplicationRepository::new());
    let service = ApplicationService::new(repository.clone(), LoanCalculator::default());
    (service, repository)
}

/// Helper to create a valid submission
fn create_test_request() -> CreateApplicationRequest {
    CreateApplicationRequest {
        amount: 1500,
        duration: 6,
        purpose: LoanPurpose::HomeImprovement,
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: "grace@example.com".to_string(),
        phone: "0612345678".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 12, 9).unwrap(),
        employment_status: EmploymentStatus::Employed,
        monthly_income: IncomeBracket::From3000To5000,
        monthly_expenses: Some(1200),
        terms_accepted: true,
        credit_check_accepted: true,
        marketing_accepted: false,
        monthly_payment: None,
        total_cost: None,
    }
}

fn step(n: i32) -> ProcessingStep {
    ProcessingStep::new(n).unwrap()
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_create_stamps_server_figures() {
    let (service, _) = setup();
    let calculator = LoanCalculator::default();

    let app = service.create(create_test_request(), None).await.unwrap();
    let expected = calculator.compute_schedule(dec!(1500), 6).unwrap();

    assert_eq!(app.monthly_payment, expected.periodic_payment);
    assert_eq!(app.total_cost, expected.total_repayment);
    assert_eq!(app.monthly_payment, dec!(253.66));
    assert_eq!(app.status, ApplicationStatus::Pending);
    assert_eq!(app.current_step, 0);
    assert_eq!(app.created_at, app.updated_at);
    assert!(app.user_id.is_none());
    assert!(app.lender_response.is_none());
}

#[tokio::test]
async fn test_create_ignores_client_figures() {
    let (service, _) = setup();
    let mut request = create_test_request();
    request.monthly_payment = Some(dec!(1.00));
    request.total_cost = Some(dec!(6.00));

    let app = service.create(request, None).await.unwrap();
    assert_eq!(app.monthly_payment, dec!(253.66));
    assert_eq!(app.total_cost, dec!(1521.96));
}

#[tokio::test]
async fn test_create_records_owner() {
    let (service, _) = setup();
    let owner = Uuid::new_v4();

    let app = service.create(create_test_request(), Some(owner)).await.unwrap();
    assert_eq!(app.user_id, Some(owner));

    let mine = service.list_by_owner(owner).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert!(service.list_by_owner(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_without_terms_fails_and_persists_nothing() {
    let (service, repository) = setup();
    let mut request = create_test_request();
    request.terms_accepted = false;

    match service.create(request, None).await {
        Err(ApplicationError::Validation(fields)) => assert!(fields.contains("termsAccepted")),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_create_measures_contact_fields_after_trimming() {
    let (service, repository) = setup();
    let mut request = create_test_request();
    request.phone = "   12345  ".to_string();

    match service.create(request, None).await {
        Err(ApplicationError::Validation(fields)) => assert!(fields.contains("phone")),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(repository.is_empty().await);

    let mut request = create_test_request();
    request.phone = "  0612345678 ".to_string();
    request.email = " grace@example.com  ".to_string();
    let app = service.create(request, None).await.unwrap();
    assert_eq!(app.phone, "0612345678");
    assert_eq!(app.email, "grace@example.com");
}

#[tokio::test]
async fn test_create_rejects_out_of_range_terms() {
    let (service, repository) = setup();
    let mut request = create_test_request();
    request.amount = 3500;
    request.duration = 1;

    match service.create(request, None).await {
        Err(ApplicationError::Validation(fields)) => {
            assert!(fields.contains("amount"));
            assert!(fields.contains("duration"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(repository.len().await, 0);
}

// ============================================================================
// Step advancement
// ============================================================================

#[tokio::test]
async fn test_advance_to_final_step_completes() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    let updated = service.advance_step(app.id, 7).await.unwrap();

    assert_eq!(updated.status, ApplicationStatus::Completed);
    assert_eq!(updated.current_step, 7);
    assert!(updated.step7_completed_at.is_some());
    assert!(updated.updated_at >= app.updated_at);
}

#[tokio::test]
async fn test_advance_unknown_application() {
    let (service, _) = setup();
    let id = Uuid::new_v4();

    assert!(matches!(
        service.advance_step(id, 1).await,
        Err(ApplicationError::NotFound(missing)) if missing == id
    ));
}

#[tokio::test]
async fn test_advance_out_of_range_step_leaves_record_untouched() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    for bad in [0, 8, -1] {
        assert!(matches!(
            service.advance_step(app.id, bad).await,
            Err(ApplicationError::InvalidArgument(_))
        ));
    }

    assert_eq!(service.get(app.id).await.unwrap(), app);
}

#[tokio::test]
async fn test_out_of_range_step_checked_before_lookup() {
    let (service, _) = setup();

    assert!(matches!(
        service.advance_step(Uuid::new_v4(), 9).await,
        Err(ApplicationError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_intermediate_steps_set_step_status() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    let after_three = service.advance_step(app.id, 3).await.unwrap();
    assert_eq!(after_three.status, ApplicationStatus::Step3);
    assert_eq!(after_three.current_step, 3);
    assert!(after_three.step_completed_at(step(3)).is_some());
    // skipped steps are not stamped
    assert!(after_three.step_completed_at(step(1)).is_none());
    assert!(after_three.step_completed_at(step(2)).is_none());
}

#[tokio::test]
async fn test_reentering_a_step_keeps_first_timestamp() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    let first = service.advance_step(app.id, 2).await.unwrap();
    let stamped = first.step2_completed_at.unwrap();

    service.advance_step(app.id, 4).await.unwrap();
    let again = service.advance_step(app.id, 2).await.unwrap();

    assert_eq!(again.step2_completed_at, Some(stamped));
    assert_eq!(again.status, ApplicationStatus::Step2);
    assert_eq!(again.current_step, 2);
    assert!(again.step4_completed_at.is_some());
}

#[tokio::test]
async fn test_stepping_back_to_a_skipped_step_leaves_it_unstamped() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    service.advance_step(app.id, 5).await.unwrap();
    let back = service.advance_step(app.id, 2).await.unwrap();

    assert_eq!(back.status, ApplicationStatus::Step2);
    assert_eq!(back.current_step, 2);
    assert!(back.step2_completed_at.is_none());
    assert!(back.step5_completed_at.is_some());

    // Moving forward again between stamped steps must not stamp out of order
    let forward = service.advance_step(app.id, 3).await.unwrap();
    assert!(forward.step3_completed_at.is_none());
}

#[tokio::test]
async fn test_step_stamps_are_ordered() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    for n in [1, 3, 2, 4, 6, 5, 7] {
        service.advance_step(app.id, n).await.unwrap();
    }
    let done = service.get(app.id).await.unwrap();

    let stamps: Vec<_> = (1..=7)
        .filter_map(|n| done.step_completed_at(step(n)))
        .collect();
    assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(done.step1_completed_at.is_some());
    assert!(done.step2_completed_at.is_none());
    assert!(done.step5_completed_at.is_none());
    assert!(done.step7_completed_at.is_some());
}

#[tokio::test]
async fn test_completed_application_rejects_further_steps() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();
    let completed = service.advance_step(app.id, 7).await.unwrap();

    assert!(matches!(
        service.advance_step(app.id, 3).await,
        Err(ApplicationError::InvalidArgument(_))
    ));
    assert_eq!(service.get(app.id).await.unwrap(), completed);
}

#[tokio::test]
async fn test_completed_application_rejects_status_changes() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();
    let completed = service.advance_step(app.id, 7).await.unwrap();

    for status in ["pending", "approved", "rejected"] {
        assert!(matches!(
            service.set_status(app.id, status).await,
            Err(ApplicationError::InvalidArgument(_))
        ));
    }
    assert!(matches!(
        service.advance_step(app.id, 3).await,
        Err(ApplicationError::InvalidArgument(_))
    ));
    assert_eq!(service.get(app.id).await.unwrap(), completed);
}

// ============================================================================
// Lender workflow
// ============================================================================

#[tokio::test]
async fn test_assign_lender() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();
    service.advance_step(app.id, 2).await.unwrap();

    let updated = service
        .assign_lender(app.id, "lender-42", "Acme Credit")
        .await
        .unwrap();

    assert_eq!(updated.lender_id.as_deref(), Some("lender-42"));
    assert_eq!(updated.lender_name.as_deref(), Some("Acme Credit"));
    assert_eq!(updated.status, ApplicationStatus::Step2);
    assert_eq!(updated.current_step, 2);
}

#[tokio::test]
async fn test_assign_lender_requires_both_fields() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    assert!(matches!(
        service.assign_lender(app.id, "", "Acme Credit").await,
        Err(ApplicationError::InvalidArgument(_))
    ));
    assert!(matches!(
        service.assign_lender(app.id, "lender-42", "   ").await,
        Err(ApplicationError::InvalidArgument(_))
    ));
    assert!(matches!(
        service.assign_lender(Uuid::new_v4(), "lender-42", "Acme").await,
        Err(ApplicationError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_lender_response_rejects_unknown_value() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    assert!(matches!(
        service.record_lender_response(app.id, "maybe", None).await,
        Err(ApplicationError::InvalidArgument(_))
    ));
    assert_eq!(service.get(app.id).await.unwrap(), app);
}

#[tokio::test]
async fn test_lender_response_does_not_touch_status() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();
    service.advance_step(app.id, 3).await.unwrap();

    let updated = service
        .record_lender_response(app.id, "approved", Some("congrats".to_string()))
        .await
        .unwrap();

    assert_eq!(updated.lender_response, Some(LenderResponse::Approved));
    assert_eq!(updated.lender_message.as_deref(), Some("congrats"));
    assert_eq!(updated.status, ApplicationStatus::Step3);

    let rejected = service
        .record_lender_response(app.id, "rejected", None)
        .await
        .unwrap();
    assert_eq!(rejected.lender_response, Some(LenderResponse::Rejected));
    assert!(rejected.lender_message.is_none());
    assert_eq!(rejected.status, ApplicationStatus::Step3);
}

#[tokio::test]
async fn test_set_account_number() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    assert!(matches!(
        service.set_account_number(app.id, "").await,
        Err(ApplicationError::InvalidArgument(_))
    ));

    let updated = service
        .set_account_number(app.id, "NL91ABNA0417164300")
        .await
        .unwrap();
    assert_eq!(updated.account_number.as_deref(), Some("NL91ABNA0417164300"));
    assert_eq!(updated.status, ApplicationStatus::Pending);
}

// ============================================================================
// Status updates and reads
// ============================================================================

#[tokio::test]
async fn test_set_status_closed_set() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    let approved = service.set_status(app.id, "approved").await.unwrap();
    assert_eq!(approved.status, ApplicationStatus::Approved);

    let rejected = service.set_status(app.id, "rejected").await.unwrap();
    assert_eq!(rejected.status, ApplicationStatus::Rejected);

    for bad in ["completed", "step3", "APPROVED", "archived"] {
        assert!(matches!(
            service.set_status(app.id, bad).await,
            Err(ApplicationError::InvalidArgument(_))
        ));
    }
    assert!(matches!(
        service.set_status(Uuid::new_v4(), "approved").await,
        Err(ApplicationError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_approval_does_not_force_completion() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();
    service.advance_step(app.id, 4).await.unwrap();

    let approved = service.set_status(app.id, "approved").await.unwrap();
    assert_eq!(approved.status, ApplicationStatus::Approved);
    assert_eq!(approved.current_step, 4);
    assert!(approved.step7_completed_at.is_none());
}

#[tokio::test]
async fn test_get_is_stable_without_mutation() {
    let (service, _) = setup();
    let app = service.create(create_test_request(), None).await.unwrap();

    let first = service.get(app.id).await.unwrap();
    let second = service.get(app.id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[tokio::test]
async fn test_get_unknown_application() {
    let (service, _) = setup();
    assert!(matches!(
        service.get(Uuid::new_v4()).await,
        Err(ApplicationError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_all_newest_first() {
    let (service, _) = setup();
    let first = service.create(create_test_request(), None).await.unwrap();
    let second = service.create(create_test_request(), None).await.unwrap();

    let all = service.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].created_at >= all[1].created_at);
    let ids: Vec<Uuid> = all.iter().map(|a| a.id).collect();
    assert!(ids.contains(&first.id) && ids.contains(&second.id));
}

#[tokio::test]
async fn test_zero_rate_calculator_is_used_for_creation() {
    let repository = Arc::new(InMemoryApplicationRepository::new());
    let service = ApplicationService::new(repository, LoanCalculator::new(Decimal::ZERO).unwrap());

    let app = service.create(create_test_request(), None).await.unwrap();
    assert_eq!(app.monthly_payment, dec!(250));
    assert_eq!(app.total_cost, dec!(1500));
}
