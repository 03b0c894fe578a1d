//! The API endpoint URIs.

/// The route for replacing the database contents with the remote seed data.
pub const INIT: &str = "/api/init";
/// The route for listing transactions with search and pagination.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for monthly sales statistics.
pub const STATISTICS: &str = "/api/statistics";
/// The route for the monthly price-range bar chart.
pub const BAR_CHART: &str = "/api/bar-chart";

// These tests are here so that we know the route constants parse as URIs.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::INIT);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::STATISTICS);
        assert_endpoint_is_valid_uri(endpoints::BAR_CHART);
    }
}
