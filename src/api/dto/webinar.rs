//! DTOs for webinar registrations.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pagination::PaginationMeta;
use crate::domain::entities::{ResolvedRegistration, WebinarRegistration};

#[derive(Debug, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 3, max = 32))]
    pub mobile: String,

    #[validate(length(min = 2, max = 64))]
    pub country: String,

    /// Raw `?ref=` value the registrant arrived with.
    #[validate(length(max = 64))]
    pub referrer_code: Option<String>,
}

/// Result of a webinar registration.
///
/// `redirect_url` is the referrer's post-registration landing page when the
/// code resolves to an account that configured one.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub registration: WebinarRegistration,
    pub redirect_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<WebinarRegistration>,
}

#[derive(Debug, Serialize)]
pub struct ResolvedRegistrationListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<ResolvedRegistration>,
}
