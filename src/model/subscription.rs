use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A stored push subscription.
///
/// `id` is assigned by the registry on first insert and survives in-place
/// updates of the same endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: u64,
    pub endpoint: String,
    pub keys: Option<Value>,
    pub expiration: Option<DateTime<Utc>>,
}

/// Redacted view of a subscription for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionSummary {
    pub id: u64,
    pub endpoint: String,
    pub keys: bool,
}
