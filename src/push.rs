use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::Local;
use jsonwebtoken::{encode, Algorithm, Header};
use tokio::sync::Semaphore;
use url::Url;

use crate::{
    configuration::Config,
    error::Error,
    model::Subscription,
    provider::HTTP,
    types::{Claims, Delivery, PushHeader, SubscriptionKeys},
    vapid::VapidKeys,
};

/// VAPID token lifetime. RFC 8292 caps it at 24 hours.
const VAPID_MAX_EXPIRATION: i64 = 12 * 60 * 60;

/// Delivers one payload to one subscription.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn deliver(&self, subscription: &Subscription, payload: &str)
        -> Delivery;
}

/// Web Push transport: VAPID signed, `aes128gcm` encrypted.
#[derive(Debug)]
pub struct WebPush {
    http: HTTP,
    vapid: Arc<VapidKeys>,
    mail_to: String,
    push_header: PushHeader,
    status_code_to_delete: Vec<u16>,
    permits: Arc<Semaphore>,
}

impl WebPush {
    pub fn new(
        config: &Config,
        vapid: Arc<VapidKeys>,
    ) -> Result<WebPush, Error> {
        let http = HTTP::new(config)?;

        Ok(WebPush {
            http,
            vapid,
            mail_to: config.mail_to.to_owned(),
            push_header: PushHeader {
                ttl: config.push_ttl,
                urgency: config.urgency,
            },
            status_code_to_delete: config.status_code_to_delete.clone(),
            permits: Arc::new(Semaphore::new(config.max_tasks)),
        })
    }

    /// Signs the VAPID token for the push service behind `endpoint`.
    pub fn vapid_token(&self, endpoint: &Url) -> Result<String, Error> {
        let aud = endpoint.origin().ascii_serialization();
        let sub = format!("mailto:{}", &self.mail_to);
        let exp = Local::now().timestamp() + VAPID_MAX_EXPIRATION;

        let claims = Claims { aud, sub, exp };
        let token = encode(
            &Header::new(Algorithm::ES256),
            &claims,
            self.vapid.encoding_key(),
        )?;

        Ok(token)
    }

    pub async fn send_push(
        &self,
        subscription: &Subscription,
        payload: &str,
    ) -> Result<u16, Error> {
        let keys = subscription.keys.clone().ok_or_else(|| {
            Error::InvalidOption {
                option: String::from("keys"),
            }
        })?;
        let keys: SubscriptionKeys = serde_json::from_value(keys)?;

        let url = Url::parse(&subscription.endpoint)?;
        if url.host().is_none() {
            return Err(Error::InvalidOption {
                option: String::from("host"),
            });
        }

        let token = self.vapid_token(&url)?;

        let p256dh = BASE64_URL.decode(keys.p256dh.trim_end_matches('='))?;
        let auth = BASE64_URL.decode(keys.auth.trim_end_matches('='))?;

        let data = ece::encrypt(&p256dh, &auth, payload.as_bytes())?;

        let _permit = self.permits.acquire().await?;
        let status = self
            .http
            .post_push(
                &subscription.endpoint,
                &token,
                self.vapid.public_key(),
                &self.push_header,
                data,
            )
            .await?;

        Ok(status)
    }
}

#[async_trait]
impl PushTransport for WebPush {
    async fn deliver(
        &self,
        subscription: &Subscription,
        payload: &str,
    ) -> Delivery {
        match self.send_push(subscription, payload).await {
            Ok(status) => classify(status, &self.status_code_to_delete),
            Err(e) => Delivery::TransientFailure(e.to_string()),
        }
    }
}

/// Maps a push service response status to a delivery outcome.
pub fn classify(status: u16, status_code_to_delete: &[u16]) -> Delivery {
    if (200..300).contains(&status) {
        return Delivery::Delivered;
    }

    if status_code_to_delete.contains(&status) {
        return Delivery::Gone(status);
    }

    Delivery::TransientFailure(format!(
        "Push service responded with status {}",
        status
    ))
}
