use actix_web::{delete, get, post, web, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::SubscriptionSummary,
    types::SubscribeRequest,
};

#[post("/subscribe")]
pub async fn post_index(
    state: web::Data<AppState<State>>,
    data: web::Json<SubscribeRequest>,
) -> Result<impl Responder, Error> {
    let subscription =
        data.into_inner().subscription.ok_or(Error::InvalidSubscription)?;

    let expiration = match subscription.expiration_time {
        Some(ms) => DateTime::<Utc>::from_timestamp_millis(ms),
        None => None,
    };

    let (_, total) = state.registry.upsert(subscription, expiration)?;

    Ok(web::Json(SubscribeResponse {
        success: true,
        message: String::from("Subscription saved successfully"),
        total_subscriptions: total,
    }))
}

#[get("/subscriptions")]
pub async fn list(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let subscriptions = state.registry.list();

    Ok(web::Json(ListResponse {
        total: subscriptions.len(),
        subscriptions,
    }))
}

#[delete("/subscribe/{id}")]
pub async fn delete_index(
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    let id = path.parse::<u64>().map_err(|_| {
        Error::NotFound(String::from("Subscription not found"))
    })?;

    let remaining = state.registry.remove(id)?;

    Ok(web::Json(DeleteResponse {
        success: true,
        message: String::from("Subscription removed"),
        remaining,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
    pub total_subscriptions: usize,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub total: usize,
    pub subscriptions: Vec<SubscriptionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub remaining: usize,
}
