//! Flow measure lifecycle loop.
//!
//! Periodically advances measures through their time-driven transitions:
//! notified measures activate at their start time, and notified or active
//! measures expire at their end time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use flow_core::enums::FlowMeasureStatus;
use flow_core::message::NotificationMessage;
use tokio::sync::broadcast;
use tokio::time::interval;

use crate::notifier;
use crate::persistence::measures;
use crate::state::AppState;

pub async fn run_lifecycle_loop(state: Arc<AppState>, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = interval(Duration::from_secs(state.config().lifecycle_interval_s));

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Lifecycle loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                if let Err(err) = advance_lifecycle(state.as_ref(), Utc::now()).await {
                    tracing::warn!("Lifecycle pass failed: {}", err);
                }
            }
        }
    }
}

/// One lifecycle pass over every measure that can still transition.
///
/// Expiry is checked before activation, so a notified measure already past
/// its end time goes straight to expired with a single notification.
pub async fn advance_lifecycle(state: &AppState, now: DateTime<Utc>) -> anyhow::Result<()> {
    let measures = measures::list_unconcluded(state.pool()).await?;

    for mut measure in measures {
        let next = if measure.end_time <= now {
            FlowMeasureStatus::Expired
        } else if measure.status == FlowMeasureStatus::Notified && measure.start_time <= now {
            FlowMeasureStatus::Active
        } else {
            continue;
        };

        measures::update_status(state.pool(), &measure.id, next).await?;
        measure.status = next;
        tracing::info!(
            "Flow measure {} transitioned to {}",
            measure.identifier,
            next.display_name()
        );

        notifier::notify(
            state.discord(),
            &measure.identifier,
            &NotificationMessage::for_status(&measure, next),
        )
        .await;
    }

    Ok(())
}
