use futures::future::join_all;
use tracing::{info, warn};

use crate::{
    dao::SubscriptionRegistry,
    error::Error,
    model::Subscription,
    push::PushTransport,
    types::{BroadcastResults, Delivery, NotificationPayload},
};

/// Delivers `payload` to every registered subscription and drops the ones
/// the push service reports as gone.
pub async fn broadcast(
    registry: &SubscriptionRegistry,
    transport: &dyn PushTransport,
    payload: &NotificationPayload,
) -> Result<BroadcastResults, Error> {
    if payload.title.trim().is_empty() || payload.body.trim().is_empty() {
        return Err(Error::InvalidPayload(String::from(
            "Title and message are required",
        )));
    }

    let subscriptions = registry.snapshot();

    if subscriptions.is_empty() {
        return Err(Error::NoSubscribers);
    }

    let body = serde_json::to_string(payload)?;

    info!("Sending notification to {} subscribers", subscriptions.len());

    let outcomes = join_all(subscriptions.iter().enumerate().map(
        |(index, subscription)| {
            let body = body.as_str();
            async move {
                let outcome = transport.deliver(subscription, body).await;
                match &outcome {
                    Delivery::Delivered => {
                        info!("Notification sent to subscriber {}", index + 1)
                    },
                    Delivery::Gone(status) => warn!(
                        "Subscriber {} is gone ({}), removing",
                        index + 1,
                        status
                    ),
                    Delivery::TransientFailure(reason) => warn!(
                        "Failed to send to subscriber {}: {}",
                        index + 1,
                        reason
                    ),
                }
                outcome
            }
        },
    ))
    .await;

    let total = subscriptions.len();
    let successful = outcomes.iter().filter(|o| o.is_delivered()).count();

    let gone: Vec<Subscription> = subscriptions
        .into_iter()
        .zip(outcomes.iter())
        .filter(|(_, outcome)| outcome.is_gone())
        .map(|(subscription, _)| subscription)
        .collect();

    let removed = registry.prune(&gone);

    info!(
        "Broadcast finished: total {}, successful {}, failed {}, removed {}",
        total,
        successful,
        total - successful,
        removed
    );

    Ok(BroadcastResults {
        total,
        successful,
        failed: total - successful,
        removed,
    })
}
