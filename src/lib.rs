//! A small REST API over a product-transaction dataset.
//!
//! The server seeds its SQLite database from a remote JSON document and
//! exposes read-only endpoints for listing transactions, monthly sales
//! statistics, and a price-range bar chart.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod bar_chart;
mod db;
mod endpoints;
mod logging;
mod pagination;
mod routing;
mod seed;
mod statistics;
mod transaction;
mod transactions;
mod window;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::DEFAULT_SEED_URL;
pub use window::DEFAULT_REFERENCE_YEAR;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The remote seed resource was unreachable, timed out, or returned a
    /// payload that could not be decoded as a transaction list.
    ///
    /// The inner string should only be logged for debugging on the server;
    /// clients receive a generic error message.
    #[error("could not fetch seed data: {0}")]
    SeedFetch(String),

    /// The `month` query parameter was not supplied.
    #[error("the 'month' query parameter is required")]
    MissingMonth,

    /// The `month` query parameter was outside the zero-based range `0..=11`.
    #[error("month must be between 0 and 11, got {0}")]
    InvalidMonth(u8),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Error::SqlError(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::SeedFetch(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::MissingMonth | Error::InvalidMonth(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Error::SeedFetch(reason) => {
                tracing::error!("could not fetch seed data: {reason}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error initializing database",
                )
                    .into_response()
            }
            Error::SqlError(error) => {
                tracing::error!("an unexpected SQL error occurred: {error}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn missing_month_maps_to_bad_request() {
        let response = Error::MissingMonth.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_month_maps_to_bad_request() {
        let response = Error::InvalidMonth(12).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn seed_fetch_error_maps_to_internal_server_error() {
        let response = Error::SeedFetch("connection refused".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn sql_error_maps_to_internal_server_error() {
        let response = Error::SqlError(rusqlite::Error::QueryReturnedNoRows).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
