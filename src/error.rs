use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use reqwest::Error as REQWEST_ERROR;
use serde_json::Error as JSON_ERROR;
use sqlx::error::Error as SQL_ERROR;
use std::{env::VarError, io::Error as IO_ERROR, num::ParseIntError};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{
    error, subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR,
};
use url::ParseError as URL_ERROR;

use crate::{model::Provider, types::ApiResponse};

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Server end with error: {0}")]
    ServerError(String),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("{provider} responded with status {status}: {body}")]
    ProviderStatus {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("{provider} returned a malformed payload: {reason}")]
    ProviderPayload { provider: Provider, reason: String },

    #[error("{0}: no tokens to fetch")]
    NoTokensToFetch(Provider),

    #[error("{0} has no supply table")]
    NoSupplyTable(Provider),

    #[error("{0}")]
    Validation(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::FORBIDDEN,

            Error::ReqwestError(_)
            | Error::ProviderStatus { .. }
            | Error::ProviderPayload { .. } => StatusCode::BAD_GATEWAY,

            Error::Io(_)
            | Error::URL(_)
            | Error::INT(_)
            | Error::SQL(_)
            | Error::VAR(_)
            | Error::TokioJoinError(_)
            | Error::JsonError(_)
            | Error::ConfigurationError(_)
            | Error::ServerError(_)
            | Error::SetGlobalDefaultError(_)
            | Error::NoTokensToFetch(_)
            | Error::NoSupplyTable(_)
            | Error::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_owned()
        } else {
            self.to_string()
        };
        let body: ApiResponse<()> =
            ApiResponse::rejected(status.as_u16(), message);
        HttpResponse::build(status).json(body)
    }
}
