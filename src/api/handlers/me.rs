//! Handlers for the current account's own referral data.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde_json::json;

use crate::api::dto::account::{AccountResponse, UpdateRedirectUrlRequest};
use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::referral::{ReferralListQuery, ReferralListResponse};
use crate::api::dto::stats::StatsResponse;
use crate::api::dto::webinar::RegistrationListResponse;
use crate::api::middleware::CurrentAccount;
use crate::domain::entities::{ReferralStatus, RegistrationFilter};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/me`
pub async fn me_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Json<AccountResponse> {
    Json(AccountResponse::new(account, &state.public_base_url))
}

/// Current statistics for the requesting referrer.
///
/// # Endpoint
///
/// `GET /api/me/stats`
pub async fn my_stats_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.stats(&account, Utc::now()).await?;

    Ok(Json(StatsResponse {
        account_id: account.id,
        referral_code: account.referral_code,
        stats,
    }))
}

/// Lists the requesting referrer's referrals, newest first.
///
/// # Endpoint
///
/// `GET /api/me/referrals?status=pending`
///
/// # Errors
///
/// Returns 400 Bad Request for an unknown status.
pub async fn my_referrals_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<ReferralListQuery>,
) -> Result<Json<ReferralListResponse>, AppError> {
    let status = parse_status_filter(query.status.as_deref())?;

    let items = state
        .ledger_service
        .list_for_referrer(account.id, status)
        .await?;

    Ok(Json(ReferralListResponse {
        total: items.len(),
        items,
    }))
}

/// Sets or clears the page registrants land on after using my code.
///
/// # Endpoint
///
/// `PATCH /api/me/redirect-url`
pub async fn update_redirect_url_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<UpdateRedirectUrlRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let updated = state
        .account_service
        .update_redirect_url(account.id, payload.redirect_url)
        .await?;

    Ok(Json(AccountResponse::new(updated, &state.public_base_url)))
}

/// Webinar registrations made with my code, newest first.
///
/// # Endpoint
///
/// `GET /api/me/webinar-registrations?page=1&page_size=25`
pub async fn my_registrations_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(params): Query<PaginationParams>,
) -> Result<Json<RegistrationListResponse>, AppError> {
    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let filter =
        RegistrationFilter::new(offset, limit).with_referrer_code(Some(account.referral_code));
    let (items, total) = state.event_service.list_registrations(filter).await?;

    Ok(Json(RegistrationListResponse {
        pagination: params.meta(total),
        items,
    }))
}

pub(crate) fn parse_status_filter(raw: Option<&str>) -> Result<Option<ReferralStatus>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|reason: String| {
                AppError::bad_request("Invalid status filter", json!({ "reason": reason }))
            }),
    }
}
