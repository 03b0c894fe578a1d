//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState, bar_chart::get_bar_chart, endpoints, logging::logging_middleware, seed::get_init,
    statistics::get_statistics, transactions::get_transactions,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::INIT, get(get_init))
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::STATISTICS, get(get_statistics))
        .route(endpoints::BAR_CHART, get(get_bar_chart))
        .layer(middleware::from_fn(logging_middleware))
        .fallback(get_not_found)
        .with_state(state)
}

async fn get_not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, PaginationConfig, build_router, endpoints};

    fn get_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory");
        let state = AppState::new(
            db_connection,
            "http://localhost:1/unused",
            2021,
            PaginationConfig::default(),
        )
        .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found() {
        let server = get_test_server();

        let response = server.get("/api/monthly-report").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn transactions_route_is_wired() {
        let server = get_test_server();

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn statistics_route_rejects_missing_month() {
        let server = get_test_server();

        let response = server.get(endpoints::STATISTICS).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
