//! Recording and listing of webinar registrations.

use std::sync::Arc;

use crate::domain::entities::{NewWebinarRegistration, RegistrationFilter, WebinarRegistration};
use crate::domain::repositories::RegistrationRepository;
use crate::error::AppError;

/// Service over the append-only webinar registration log.
///
/// Clicks have no service: they are written only by
/// [`crate::domain::click_worker::run_click_worker`] from the redirect queue.
/// Neither log consults accounts or referrals, so a row is stored even when
/// its code belongs to nobody.
pub struct EventService<W>
where
    W: RegistrationRepository + ?Sized,
{
    registrations: Arc<W>,
}

impl<W> EventService<W>
where
    W: RegistrationRepository + ?Sized,
{
    pub fn new(registrations: Arc<W>) -> Self {
        Self { registrations }
    }

    /// Appends a webinar registration with its referrer code stored verbatim.
    pub async fn record_webinar_registration(
        &self,
        new_registration: NewWebinarRegistration,
    ) -> Result<WebinarRegistration, AppError> {
        let registration = self
            .registrations
            .record_registration(new_registration)
            .await?;

        metrics::counter!("webinar_registrations_total").increment(1);
        tracing::info!(
            registration_id = registration.id,
            webinar_id = %registration.webinar_id,
            referrer_code = ?registration.referrer_code,
            "Webinar registration recorded"
        );

        Ok(registration)
    }

    /// Returns one page of registrations and the total matching count.
    pub async fn list_registrations(
        &self,
        filter: RegistrationFilter,
    ) -> Result<(Vec<WebinarRegistration>, i64), AppError> {
        let items = self.registrations.list(filter.clone()).await?;
        let total = self.registrations.count(filter).await?;
        Ok((items, total))
    }
}
