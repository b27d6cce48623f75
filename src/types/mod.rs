//! Types module
//!
//! Wire types for the HTTP API and the push transport.

mod push;

pub use push::{
    BroadcastResults, Claims, Delivery, NotificationPayload, PushHeader,
    SendNotificationRequest, SubscribeRequest, SubscriptionData,
    SubscriptionKeys, Urgency,
};
