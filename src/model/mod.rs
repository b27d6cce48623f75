//! Registry models
//!
//! Records as held by the subscription registry.

mod subscription;

pub use subscription::{Subscription, SubscriptionSummary};
