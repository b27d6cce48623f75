//! Push notification types
//!
//! Request bodies, push message formatting and delivery outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, io, str::FromStr};

// =============================================================================
// Push Message Types
// =============================================================================

#[derive(Debug, Clone)]
pub struct PushHeader {
    pub ttl: u32,
    pub urgency: Urgency,
}

/// JSON body delivered to the service worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub url: String,
    pub timestamp: i64,
}

// =============================================================================
// Urgency Enum
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    VeryLow,
    Low,
    Normal,
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Urgency::VeryLow => write!(f, "very-low"),
            Urgency::Low => write!(f, "low"),
            Urgency::Normal => write!(f, "normal"),
            Urgency::High => write!(f, "high"),
        }
    }
}

impl FromStr for Urgency {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<Urgency, Self::Err> {
        match value {
            "very-low" => Ok(Urgency::VeryLow),
            "low" => Ok(Urgency::Low),
            "normal" => Ok(Urgency::Normal),
            "high" => Ok(Urgency::High),
            _ => Err(io::Error::other("Urgency not supported")),
        }
    }
}

// =============================================================================
// Delivery Outcome
// =============================================================================

/// Result of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The push service reports the subscription as permanently invalid.
    Gone(u16),
    TransientFailure(String),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered)
    }

    pub fn is_gone(&self) -> bool {
        matches!(self, Delivery::Gone(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResults {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub removed: usize,
}

// =============================================================================
// Subscription Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub subscription: Option<SubscriptionData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionData {
    pub endpoint: Option<String>,
    #[serde(alias = "expirationTime")]
    pub expiration_time: Option<i64>,
    /// Stored as sent; only the transport reads it.
    pub keys: Option<Value>,
}

/// Shape of `keys` the Web Push transport needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub url: Option<String>,
}

// =============================================================================
// JWT Claims
// =============================================================================

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub aud: String,
    pub sub: String,
    pub exp: i64,
}
