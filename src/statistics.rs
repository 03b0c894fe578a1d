//! The monthly sales statistics endpoint.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    window::{MonthQuery, MonthWindow},
};

/// The response body for the statistics endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatisticsResponse {
    /// The sum of prices over the month window, zero if the window is empty.
    total_sales_amount: f64,
    /// The number of sold transactions in the month window.
    sold_items: i64,
    /// The number of unsold transactions in the month window.
    not_sold_items: i64,
}

/// A route handler for monthly sales statistics.
///
/// `month` is a required zero-based month index into the configured
/// reference year.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub(crate) async fn get_statistics(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<StatisticsResponse>, Error> {
    let month = query.month.ok_or(Error::MissingMonth)?;
    let window = MonthWindow::from_month_index(state.reference_year, month)?;

    let connection = state.db_connection.lock().unwrap();
    let total_sales_amount = total_sales_amount(window, &connection)?;
    let sold_items = count_by_sold_flag(window, true, &connection)?;
    let not_sold_items = count_by_sold_flag(window, false, &connection)?;

    Ok(Json(StatisticsResponse {
        total_sales_amount,
        sold_items,
        not_sold_items,
    }))
}

/// Sum the prices of every transaction in `window`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
fn total_sales_amount(window: MonthWindow, connection: &Connection) -> Result<f64, Error> {
    let total = connection
        .prepare(
            "SELECT COALESCE(SUM(price), 0) FROM \"transaction\"
             WHERE sale_time >= ?1 AND sale_time < ?2",
        )?
        .query_row((window.start, window.end), |row| row.get(0))?;

    Ok(total)
}

/// Count the transactions in `window` with the given `sold` flag.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
fn count_by_sold_flag(
    window: MonthWindow,
    sold: bool,
    connection: &Connection,
) -> Result<i64, Error> {
    let count = connection
        .prepare(
            "SELECT COUNT(*) FROM \"transaction\"
             WHERE sale_time >= ?1 AND sale_time < ?2 AND sold = ?3",
        )?
        .query_row((window.start, window.end, sold), |row| row.get(0))?;

    Ok(count)
}
