//! Miscellaneous API endpoints
//!
//! VAPID public key and version.

use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VapidPublicKeyResponse {
    pub public_key: String,
}

#[get("/vapidPublicKey")]
pub async fn vapid_public_key(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    Ok(web::Json(VapidPublicKeyResponse {
        public_key: state.vapid_public_key.to_owned(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse<'a> {
    pub version: Option<&'a str>,
}

#[get("/version")]
pub async fn version() -> Result<impl Responder, Error> {
    const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

    Ok(web::Json(VersionResponse { version: VERSION }))
}
