//! The transaction listing endpoint with search and pagination.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    transaction::{TRANSACTION_COLUMNS, Transaction},
};

/// The query parameters accepted by the transaction listing endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    /// Case-insensitive substring to match against titles and descriptions.
    search: Option<String>,
    /// The one-based page number.
    page: Option<u64>,
    /// The number of transactions per page.
    per_page: Option<u64>,
}

/// The response body for the transaction listing endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct TransactionListResponse {
    /// The transactions on the requested page.
    transactions: Vec<Transaction>,
    /// The number of matching transactions across all pages.
    total: i64,
}

/// A route handler for listing transactions.
///
/// An empty or absent `search` matches every transaction. `page` and
/// `per_page` values below 1 are clamped to 1. `total` counts every match
/// regardless of pagination.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub(crate) async fn get_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TransactionListResponse>, Error> {
    let search = query.search.unwrap_or_default();
    let page = query
        .page
        .unwrap_or(state.pagination_config.default_page)
        .max(1);
    let per_page = query
        .per_page
        .unwrap_or(state.pagination_config.default_page_size)
        .max(1);
    let offset = page.saturating_sub(1).saturating_mul(per_page);

    let connection = state.db_connection.lock().unwrap();
    let total = count_matching(&search, &connection)?;
    let transactions = get_transaction_page(&search, per_page, offset, &connection)?;

    Ok(Json(TransactionListResponse { transactions, total }))
}

/// A `WHERE` clause matching `?1` as a case-insensitive substring of the
/// title or the description.
///
/// `?1` must be escaped with [escape_like_pattern] so that `%` and `_` in
/// the search term match themselves instead of acting as wildcards.
const SEARCH_PREDICATE: &str = "title LIKE '%' || ?1 || '%' ESCAPE '\\' \
     OR description LIKE '%' || ?1 || '%' ESCAPE '\\'";

/// Escape `\`, `%`, and `_` so `term` matches literally in a `LIKE` pattern.
fn escape_like_pattern(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Count every transaction matching `search`, ignoring pagination.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
fn count_matching(search: &str, connection: &Connection) -> Result<i64, Error> {
    let count = connection
        .prepare(&format!(
            "SELECT COUNT(*) FROM \"transaction\" WHERE {SEARCH_PREDICATE}"
        ))?
        .query_row([escape_like_pattern(search)], |row| row.get(0))?;

    Ok(count)
}

/// Get one page of transactions matching `search`, in insertion order.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
fn get_transaction_page(
    search: &str,
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // Sort by ID so the page windows are stable across calls
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE {SEARCH_PREDICATE} \
         ORDER BY id ASC LIMIT ?2 OFFSET ?3"
    );

    // Clamp rather than wrap so an astronomically numbered page comes back
    // empty instead of silently becoming page 1.
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);

    connection
        .prepare(&query)?
        .query_map(
            (escape_like_pattern(search), limit, offset),
            Transaction::map_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod transaction_listing_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;
    use time::{Duration, macros::datetime};

    use crate::{
        AppState, PaginationConfig, build_router, db::initialize, endpoints,
        seed::replace_transactions, transaction::SeedTransaction,
    };

    use super::{count_matching, get_transaction_page};

    fn make_transaction(title: &str, description: &str) -> SeedTransaction {
        SeedTransaction {
            title: title.to_string(),
            price: 25.0,
            description: description.to_string(),
            category: "electronics".to_string(),
            image: "https://example.com/item.jpg".to_string(),
            sold: false,
            date_of_sale: datetime!(2021-03-01 09:00:00 UTC),
        }
    }

    /// Twelve records matching "phone" plus three that do not.
    fn phone_heavy_seed() -> Vec<SeedTransaction> {
        let mut seed: Vec<SeedTransaction> = (1..=12)
            .map(|i| {
                let mut transaction = if i % 2 == 0 {
                    make_transaction(&format!("Phone Case #{i}"), "Durable cover")
                } else {
                    make_transaction(&format!("Charging Dock #{i}"), "Fits every smartphone")
                };
                // Distinct dates keep insertion order meaningful.
                transaction.date_of_sale += Duration::hours(i);
                transaction
            })
            .collect();

        seed.push(make_transaction("Desk Lamp", "Warm light"));
        seed.push(make_transaction("Notebook", "A5 dotted paper"));
        seed.push(make_transaction("Water Bottle", "Insulated steel"));

        seed
    }

    fn get_seeded_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not open database in memory");
        initialize(&connection).expect("Could not initialize database");
        replace_transactions(&phone_heavy_seed(), &connection)
            .expect("Could not seed transactions");
        connection
    }

    fn get_seeded_server() -> TestServer {
        let state = AppState::new(
            get_seeded_connection(),
            "http://localhost:1/unused",
            2021,
            PaginationConfig::default(),
        )
        .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    #[test]
    fn count_is_independent_of_pagination() {
        let connection = get_seeded_connection();

        let total = count_matching("phone", &connection).unwrap();

        assert_eq!(total, 12);
    }

    #[test]
    fn empty_search_matches_every_transaction() {
        let connection = get_seeded_connection();

        let total = count_matching("", &connection).unwrap();

        assert_eq!(total, 15);
    }

    #[test]
    fn search_is_case_insensitive() {
        let connection = get_seeded_connection();

        let transactions = get_transaction_page("PhOnE", 100, 0, &connection).unwrap();

        assert_eq!(transactions.len(), 12);
        for transaction in transactions {
            let title = transaction.title.to_lowercase();
            let description = transaction.description.to_lowercase();
            assert!(
                title.contains("phone") || description.contains("phone"),
                "{title:?} / {description:?} does not match 'phone'"
            );
        }
    }

    #[test]
    fn pages_partition_the_match_set() {
        let connection = get_seeded_connection();

        let page_one = get_transaction_page("phone", 5, 0, &connection).unwrap();
        let page_two = get_transaction_page("phone", 5, 5, &connection).unwrap();
        let page_three = get_transaction_page("phone", 5, 10, &connection).unwrap();

        assert_eq!(page_one.len(), 5);
        assert_eq!(page_two.len(), 5);
        assert_eq!(page_three.len(), 2);

        let all = get_transaction_page("phone", 100, 0, &connection).unwrap();
        let rejoined: Vec<_> = page_one
            .into_iter()
            .chain(page_two)
            .chain(page_three)
            .collect();
        assert_eq!(rejoined, all);
    }

    #[test]
    fn wildcards_in_search_match_literally() {
        let connection =
            Connection::open_in_memory().expect("Could not open database in memory");
        initialize(&connection).expect("Could not initialize database");
        let seed = vec![
            make_transaction("AXB", "plain"),
            make_transaction("A_B", "plain"),
            make_transaction("50% off poster", "sale item"),
        ];
        replace_transactions(&seed, &connection).expect("Could not seed transactions");

        assert_eq!(count_matching("A_B", &connection).unwrap(), 1);
        assert_eq!(count_matching("50%", &connection).unwrap(), 1);

        let transactions = get_transaction_page("A_B", 10, 0, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "A_B");
    }

    #[test]
    fn astronomical_offset_returns_no_rows() {
        let connection = get_seeded_connection();

        let transactions = get_transaction_page("", 5, u64::MAX, &connection).unwrap();

        assert!(transactions.is_empty());
    }

    #[test]
    fn oversized_page_clips_to_total() {
        let connection = get_seeded_connection();

        let transactions = get_transaction_page("", 1_000, 0, &connection).unwrap();

        assert_eq!(transactions.len(), 15);
    }

    #[tokio::test]
    async fn second_page_starts_at_the_sixth_match() {
        let server = get_seeded_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("search", "phone")
            .add_query_param("page", 2)
            .add_query_param("per_page", 5)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total"], 12);

        let transactions = body["transactions"]
            .as_array()
            .expect("transactions should be an array");
        assert_eq!(transactions.len(), 5);

        let all_matches: Value = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("search", "phone")
            .add_query_param("per_page", 100)
            .await
            .json();
        assert_eq!(
            transactions[0]["id"],
            all_matches["transactions"][5]["id"],
            "page 2 should start at the sixth match"
        );
    }

    #[tokio::test]
    async fn page_beyond_the_data_is_empty() {
        let server = get_seeded_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", u64::MAX)
            .add_query_param("per_page", u64::MAX)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total"], 15);
        assert!(body["transactions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_defaults_to_ten_per_page() {
        let server = get_seeded_server();

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total"], 15);
        assert_eq!(body["transactions"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn listing_serializes_camel_case_dates() {
        let server = get_seeded_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("per_page", 1)
            .await;

        let body: Value = response.json();
        let first = &body["transactions"][0];
        assert!(first.get("dateOfSale").is_some());
        assert!(first.get("date_of_sale").is_none());
    }
}
