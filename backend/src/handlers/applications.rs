//! Loan application handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::application::{
    AccountNumberRequest, AdvanceStepRequest, AssignLenderRequest, CreateApplicationRequest,
    LenderResponseRequest, ListApplicationsQuery, LoanApplication, StatusRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AdminUser, AuthenticatedUser, OptionalUser};
use crate::state::AppState;

/// Largest difference tolerated between client preview and server figures
const PREVIEW_TOLERANCE: Decimal = dec!(0.01);

/// Submit a new application
pub async fn create_application(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    payload: Result<Json<CreateApplicationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LoanApplication>)> {
    if state.require_auth && user.is_none() {
        return Err(ApiError::Unauthorized(
            "Sign in to submit an application".to_string(),
        ));
    }

    let Json(request) = payload?;

    let preview = (request.monthly_payment, request.total_cost);
    let owner = user.map(|u| u.user_id);
    let application = state.application_service.create(request, owner).await?;

    if let (Some(payment), Some(total)) = preview {
        let drift = (payment - application.monthly_payment)
            .abs()
            .max((total - application.total_cost).abs());
        if drift > PREVIEW_TOLERANCE {
            tracing::warn!(
                application_id = %application.id,
                client_payment = %payment,
                server_payment = %application.monthly_payment,
                "Client quote preview differs from server figures"
            );
        }
    }

    tracing::info!(
        application_id = %application.id,
        amount = application.amount,
        duration = application.duration,
        owner = ?application.user_id,
        "Application created"
    );

    Ok((StatusCode::CREATED, Json(application)))
}

/// Get a single application
///
/// Owned applications are visible to their owner and to admins. Anonymous
/// submissions stay readable by id unless sessions are required.
pub async fn get_application(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LoanApplication>> {
    if state.require_auth && user.is_none() {
        return Err(ApiError::Unauthorized(
            "Sign in to view applications".to_string(),
        ));
    }

    let application = state.application_service.get(id).await?;
    ensure_can_view(user.as_ref(), &application)?;

    Ok(Json(application))
}

fn ensure_can_view(
    user: Option<&AuthenticatedUser>,
    application: &LoanApplication,
) -> Result<(), ApiError> {
    let Some(owner) = application.user_id else {
        return Ok(());
    };

    match user {
        Some(user) if user.is_admin() || user.user_id == owner => Ok(()),
        Some(_) => Err(ApiError::Forbidden(
            "Application belongs to another user".to_string(),
        )),
        None => Err(ApiError::Unauthorized(
            "Sign in to view this application".to_string(),
        )),
    }
}

/// List all applications, optionally for one owner
pub async fn list_applications(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    query: Result<Query<ListApplicationsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<LoanApplication>>> {
    let Query(query) = query?;

    let applications = match query.user_id {
        Some(user_id) => state.application_service.list_by_owner(user_id).await?,
        None => state.application_service.list_all().await?,
    };

    Ok(Json(applications))
}

/// List the caller's own applications
pub async fn list_my_applications(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<Vec<LoanApplication>>> {
    let applications = state.application_service.list_by_owner(user.user_id).await?;
    Ok(Json(applications))
}

// ===== Admin workflow =====

pub async fn advance_step(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<AdvanceStepRequest>, JsonRejection>,
) -> ApiResult<Json<LoanApplication>> {
    let Json(request) = payload?;
    let application = state
        .application_service
        .advance_step(id, request.step)
        .await?;

    tracing::info!(
        application_id = %id,
        step = request.step,
        status = application.status.as_str(),
        admin = %admin.user_id,
        "Application step advanced"
    );

    Ok(Json(application))
}

pub async fn assign_lender(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<AssignLenderRequest>, JsonRejection>,
) -> ApiResult<Json<LoanApplication>> {
    let Json(request) = payload?;
    let application = state
        .application_service
        .assign_lender(
            id,
            request.lender_id.as_deref().unwrap_or_default(),
            request.lender_name.as_deref().unwrap_or_default(),
        )
        .await?;

    tracing::info!(
        application_id = %id,
        lender_id = ?application.lender_id,
        admin = %admin.user_id,
        "Lender assigned"
    );

    Ok(Json(application))
}

pub async fn record_lender_response(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<LenderResponseRequest>, JsonRejection>,
) -> ApiResult<Json<LoanApplication>> {
    let Json(request) = payload?;
    let application = state
        .application_service
        .record_lender_response(id, &request.response, request.message)
        .await?;

    tracing::info!(
        application_id = %id,
        response = %request.response,
        admin = %admin.user_id,
        "Lender response recorded"
    );

    Ok(Json(application))
}

pub async fn set_account_number(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<AccountNumberRequest>, JsonRejection>,
) -> ApiResult<Json<LoanApplication>> {
    let Json(request) = payload?;
    let application = state
        .application_service
        .set_account_number(id, request.account_number.as_deref().unwrap_or_default())
        .await?;

    tracing::info!(application_id = %id, admin = %admin.user_id, "Account number issued");

    Ok(Json(application))
}

pub async fn set_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult<Json<LoanApplication>> {
    let Json(request) = payload?;
    let application = state
        .application_service
        .set_status(id, &request.status)
        .await?;

    tracing::info!(
        application_id = %id,
        status = application.status.as_str(),
        admin = %admin.user_id,
        "Application status set"
    );

    Ok(Json(application))
}
