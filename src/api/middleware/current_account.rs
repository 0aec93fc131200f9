//! Current-account extractors.
//!
//! Session handling lives upstream. The gateway in front of this service
//! authenticates the caller and forwards the account id in
//! [`ACCOUNT_ID_HEADER`]; these extractors turn it into a loaded [`Account`].

use axum::{extract::FromRequestParts, http::request::Parts};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::Account;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the authenticated account id.
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";

/// The account making the request.
///
/// # Errors
///
/// Rejects with `401 Unauthorized` if the header is missing, is not a UUID,
/// or names an account that does not exist.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(CurrentAccount(account): CurrentAccount) -> Json<Account> {
///     Json(account)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

/// The requesting account, required to hold the administrator role.
///
/// # Errors
///
/// Same as [`CurrentAccount`], plus `403 Forbidden` for standard accounts.
#[derive(Debug, Clone)]
pub struct AdminAccount(pub Account);

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACCOUNT_ID_HEADER)
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Account header is missing" }),
                )
            })?
            .to_str()
            .map_err(|_| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Account header is not valid text" }),
                )
            })?;

        let id = Uuid::parse_str(raw.trim()).map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Account header is not a valid id" }),
            )
        })?;

        let account = state.account_service.find(id).await?.ok_or_else(|| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Unknown account" }))
        })?;

        Ok(CurrentAccount(account))
    }
}

impl FromRequestParts<AppState> for AdminAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentAccount(account) = CurrentAccount::from_request_parts(parts, state).await?;

        if !account.is_administrator() {
            tracing::warn!(account_id = %account.id, "Administrator endpoint refused");
            return Err(AppError::forbidden(
                "Administrator role required",
                json!({ "account_id": account.id }),
            ));
        }

        Ok(AdminAccount(account))
    }
}
