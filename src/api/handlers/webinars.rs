//! Handler for public webinar registration.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::webinar::{RegistrationRequest, RegistrationResponse};
use crate::domain::entities::NewWebinarRegistration;
use crate::error::AppError;
use crate::state::AppState;

const MAX_WEBINAR_ID_LENGTH: usize = 128;

/// Registers an attendee for a webinar.
///
/// # Endpoint
///
/// `POST /api/webinars/{webinar_id}/registrations`
///
/// # Referrer Code
///
/// Stored exactly as received and never validated against accounts, so the
/// registration succeeds whatever the state of referral bookkeeping. A blank
/// code is treated as no code.
///
/// After the write, the stored code is looked up exactly once to return the
/// referrer's `redirect_url`. Lookup failures are logged and yield `null`.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
pub async fn webinar_registration_handler(
    Path(webinar_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    payload.validate()?;

    if webinar_id.trim().is_empty() || webinar_id.len() > MAX_WEBINAR_ID_LENGTH {
        return Err(AppError::bad_request(
            "Invalid webinar id",
            json!({ "webinar_id": webinar_id }),
        ));
    }

    let referrer_code = payload.referrer_code.filter(|c| !c.trim().is_empty());

    let registration = state
        .event_service
        .record_webinar_registration(NewWebinarRegistration {
            name: payload.name,
            email: payload.email,
            mobile: payload.mobile,
            country: payload.country,
            webinar_id,
            referrer_code,
        })
        .await?;

    let redirect_url = match registration.referrer_code.as_deref() {
        None => None,
        Some(code) => match state.account_service.find_by_stored_code(code).await {
            Ok(owner) => owner.and_then(|a| a.redirect_url),
            Err(e) => {
                tracing::warn!(code, error = %e, "Referrer lookup failed after registration");
                None
            }
        },
    };

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            registration,
            redirect_url,
        }),
    ))
}
