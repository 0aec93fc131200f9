//! Handler for account signup with referral attribution.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::account::{AccountResponse, SignupRequest, SignupResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Registers an account and credits its referrer.
///
/// # Endpoint
///
/// `POST /api/signups`
///
/// # Request Body
///
/// ```json
/// {
///   "account_id": "5f0c...",
///   "full_name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "referral_code": "QR1A2B3C"
/// }
/// ```
///
/// # Attribution
///
/// Runs after the account is stored. A failure there is logged and reported
/// in `attribution_error`; the account is kept and the response is still
/// `201 Created`.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the account id is already registered.
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    payload.validate()?;

    let account = state
        .account_service
        .register(payload.account_id, payload.full_name, payload.email)
        .await?;

    let (attribution, attribution_error) = match state
        .attribution_service
        .attribute(payload.referral_code.as_deref(), account.id)
        .await
    {
        Ok(outcome) => (Some(outcome), None),
        Err(e) => {
            metrics::counter!("referral_attribution_failures_total").increment(1);
            tracing::warn!(
                account_id = %account.id,
                error = %e,
                "Attribution failed, signup kept"
            );
            (None, Some(e.to_error_info()))
        }
    };

    // Re-read so the response reflects a referrer set by attribution.
    let account = match state.account_service.find(account.id).await {
        Ok(Some(fresh)) => fresh,
        Ok(None) => account,
        Err(e) => {
            tracing::warn!(
                account_id = %account.id,
                error = %e,
                "Re-reading account after signup failed, returning pre-attribution state"
            );
            account
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            account: AccountResponse::new(account, &state.public_base_url),
            attribution,
            attribution_error,
        }),
    ))
}
