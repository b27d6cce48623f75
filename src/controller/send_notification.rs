use actix_web::{post, web, Responder};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::broadcast,
    types::{BroadcastResults, NotificationPayload, SendNotificationRequest},
};

#[post("/send-notification")]
pub async fn index(
    state: web::Data<AppState<State>>,
    data: web::Json<SendNotificationRequest>,
) -> Result<impl Responder, Error> {
    let data = data.into_inner();

    let payload = NotificationPayload {
        title: data.title.unwrap_or_default(),
        body: data.message.unwrap_or_default(),
        icon: state.config.notification_icon.to_owned(),
        badge: state.config.notification_badge.to_owned(),
        url: data
            .url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| String::from("/")),
        timestamp: Utc::now().timestamp_millis(),
    };

    let results =
        broadcast(&state.registry, &*state.transport, &payload).await?;

    Ok(web::Json(Response {
        success: true,
        message: String::from("Notifications sent"),
        results,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
    pub results: BroadcastResults,
}
