use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use anyhow::Error as ANYHOW_ERROR;
use base64::DecodeError as BASE64_DECODE_ERROR;
use ece::Error as ECE_ERROR;
use jsonwebtoken::errors::Error as JWT_ERROR;
use reqwest::header::{
    InvalidHeaderName as INVALID_HEADER_NAME,
    InvalidHeaderValue as INVALID_HEADER_VALUE,
};
use reqwest::Error as REQWEST_ERROR;
use serde_json::Error as JSON_ERROR;
use std::{io::Error as IO_ERROR, num::ParseIntError};
use thiserror::Error;
use tokio::{sync::AcquireError as ACQUIRE_ERROR, task::JoinError};
use tracing::{
    error, subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR,
};
use url::ParseError as URL_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid subscription object")]
    InvalidSubscription,

    #[error("{0}")]
    InvalidPayload(String),

    #[error("No subscriptions found")]
    NoSubscribers,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    Base64DecodeError(#[from] BASE64_DECODE_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("{0}")]
    AnyHowError(#[from] ANYHOW_ERROR),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("{0}")]
    InvalidHeaderName(#[from] INVALID_HEADER_NAME),

    #[error("{0}")]
    InvalidHeaderValue(#[from] INVALID_HEADER_VALUE),

    #[error("Invalid option {option}")]
    InvalidOption { option: String },

    #[error("{0}")]
    EceError(#[from] ECE_ERROR),

    #[error("{0}")]
    JWT(#[from] JWT_ERROR),

    #[error("VAPID key error: {0}")]
    VapidKey(String),

    #[error("{0}")]
    AcquireError(#[from] ACQUIRE_ERROR),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request - client sent invalid input
            Error::InvalidSubscription
            | Error::InvalidPayload(_)
            | Error::NoSubscribers => StatusCode::BAD_REQUEST,

            // 404 Not Found - requested resource does not exist
            Error::NotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error - everything else
            Error::Io(_)
            | Error::URL(_)
            | Error::INT(_)
            | Error::TokioJoinError(_)
            | Error::Base64DecodeError(_)
            | Error::ConfigurationError(_)
            | Error::JsonError(_)
            | Error::SetGlobalDefaultError(_)
            | Error::AnyHowError(_)
            | Error::ReqwestError(_)
            | Error::InvalidHeaderName(_)
            | Error::InvalidHeaderValue(_)
            | Error::InvalidOption { .. }
            | Error::EceError(_)
            | Error::JWT(_)
            | Error::VapidKey(_)
            | Error::AcquireError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            String::from("Internal server error")
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });
        HttpResponse::build(status).json(body)
    }
}
