//! Back-office handlers for the commission ledger.
//!
//! Every handler here requires [`AdminAccount`].

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::api::dto::pagination::RegistrationQueryParams;
use crate::api::dto::referral::{CommissionRequest, TransitionRequest};
use crate::api::dto::stats::StatsResponse;
use crate::api::dto::webinar::ResolvedRegistrationListResponse;
use crate::api::middleware::AdminAccount;
use crate::domain::entities::{Referral, ReferralStatus, RegistrationFilter};
use crate::error::AppError;
use crate::state::AppState;

/// Moves a referral to its next status.
///
/// # Endpoint
///
/// `POST /api/admin/referrals/{id}/status`
///
/// # Errors
///
/// Returns 400 Bad Request for an unknown status.
/// Returns 404 Not Found if the referral does not exist.
/// Returns 409 Conflict (`invalid_transition`) for anything but
/// `pending -> completed` or `completed -> paid`.
pub async fn transition_referral_handler(
    State(state): State<AppState>,
    AdminAccount(admin): AdminAccount,
    Path(id): Path<i64>,
    Json(payload): Json<TransitionRequest>,
) -> Result<Json<Referral>, AppError> {
    let target: ReferralStatus = payload.status.parse().map_err(|reason: String| {
        AppError::bad_request("Invalid status", json!({ "reason": reason }))
    })?;

    let referral = state.ledger_service.transition(id, target).await?;
    tracing::info!(admin_id = %admin.id, referral_id = id, status = %target, "Ledger transition applied");

    Ok(Json(referral))
}

/// Sets a referral's commission amount.
///
/// # Endpoint
///
/// `PUT /api/admin/referrals/{id}/commission`
///
/// # Errors
///
/// Returns 422 Unprocessable Entity (`invalid_amount`) for negative amounts.
/// Returns 404 Not Found if the referral does not exist.
pub async fn set_commission_handler(
    State(state): State<AppState>,
    AdminAccount(admin): AdminAccount,
    Path(id): Path<i64>,
    Json(payload): Json<CommissionRequest>,
) -> Result<Json<Referral>, AppError> {
    let referral = state
        .ledger_service
        .set_commission(id, payload.amount)
        .await?;
    tracing::info!(admin_id = %admin.id, referral_id = id, "Commission updated by administrator");

    Ok(Json(referral))
}

/// `GET /api/admin/accounts/{id}/stats`
pub async fn account_stats_handler(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Path(account_id): Path<Uuid>,
) -> Result<Json<StatsResponse>, AppError> {
    let account = state.account_service.get(account_id).await?;
    let stats = state.stats_service.stats(&account, Utc::now()).await?;

    Ok(Json(StatsResponse {
        account_id: account.id,
        referral_code: account.referral_code,
        stats,
    }))
}

/// Lists webinar registrations with referrer names resolved.
///
/// # Endpoint
///
/// `GET /api/admin/webinar-registrations?webinar_id=w-42&page=1&page_size=25`
///
/// Codes that belong to no account are returned with state `unresolved`
/// and no display name.
pub async fn list_registrations_handler(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Query(params): Query<RegistrationQueryParams>,
) -> Result<Json<ResolvedRegistrationListResponse>, AppError> {
    let (offset, limit) = params
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let filter = RegistrationFilter::new(offset, limit).with_webinar(params.webinar_id);
    let (registrations, total) = state.event_service.list_registrations(filter).await?;
    let items = state
        .stats_service
        .resolve_referrer_names(registrations)
        .await?;

    Ok(Json(ResolvedRegistrationListResponse {
        pagination: params.pagination.meta(total),
        items,
    }))
}
