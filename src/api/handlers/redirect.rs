//! Handler for shared referral links.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use serde_json::json;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_normalizer::signup_link;

/// Records a click and forwards the visitor to the signup page.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// # Click Tracking
///
/// The code is queued exactly as received; it is not resolved, so clicks on
/// unknown or mistyped codes are still logged. If the queue is full the
/// click is dropped and the redirect still happens.
///
/// # Response
///
/// `307 Temporary Redirect` to `SIGNUP_URL?ref={code}`.
pub async fn referral_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    match state.click_sender.try_send(ClickEvent::new(code.clone())) {
        Ok(()) => metrics::counter!("referral_clicks_queued_total").increment(1),
        Err(TrySendError::Full(event)) => {
            metrics::counter!("referral_clicks_dropped_total").increment(1);
            tracing::warn!(code = %event.referral_code, "Click queue full, click dropped");
        }
        Err(TrySendError::Closed(event)) => {
            metrics::counter!("referral_clicks_dropped_total").increment(1);
            tracing::error!(code = %event.referral_code, "Click queue closed, click dropped");
        }
    }

    let target = signup_link(&state.signup_url, &code).map_err(|e| {
        AppError::internal(
            "Signup URL is misconfigured",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(Redirect::temporary(&target))
}
