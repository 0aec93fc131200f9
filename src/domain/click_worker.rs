//! Background worker persisting queued click events.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Retries after the first failed insert.
const MAX_RETRIES: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// At most `concurrency` inserts run at once. Each insert is retried with
/// jittered exponential backoff on store failures; a click that still fails
/// is logged and counted, never re-queued. In-flight inserts are awaited
/// before the worker returns.
pub async fn run_click_worker<C>(
    mut rx: mpsc::Receiver<ClickEvent>,
    clicks: Arc<C>,
    concurrency: usize,
) where
    C: ClickRepository + ?Sized + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let clicks = clicks.clone();

        in_flight.spawn(async move {
            let _permit = permit;
            persist_click(clicks.as_ref(), event).await;
        });

        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}
    tracing::info!("Click worker stopped");
}

async fn persist_click<C>(clicks: &C, event: ClickEvent)
where
    C: ClickRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(10)
        .map(jitter)
        .take(MAX_RETRIES);

    let result = Retry::spawn(strategy, || {
        let new_click = NewClick {
            referral_code: event.referral_code.clone(),
        };
        async move { clicks.record_click(new_click).await }
    })
    .await;

    match result {
        Ok(click) => {
            metrics::counter!("referral_clicks_recorded_total").increment(1);
            tracing::debug!(click_id = click.id, code = %click.referral_code, "Click recorded");
        }
        Err(e) => {
            metrics::counter!("referral_clicks_failed_total").increment(1);
            log_failure(&event, &e);
        }
    }
}

fn log_failure(event: &ClickEvent, e: &AppError) {
    tracing::error!(
        code = %event.referral_code,
        error = %e,
        "Failed to record click after retries"
    );
}
