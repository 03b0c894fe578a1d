//! The monthly price-range bar chart endpoint.

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

/// A fixed price bucket.
///
/// A bucket covers `[min, max)`, or `[min, ∞)` when `max` is `None`. The
/// labels keep the wire values clients already know, so the label `0-100`
/// covers prices up to but excluding 101 and the buckets partition the whole
/// non-negative price range.
struct PriceBucket {
    label: &'static str,
    min: f64,
    max: Option<f64>,
}

/// The ten price buckets, in response order.
const PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket { label: "0-100", min: 0.0, max: Some(101.0) },
    PriceBucket { label: "101-200", min: 101.0, max: Some(201.0) },
    PriceBucket { label: "201-300", min: 201.0, max: Some(301.0) },
    PriceBucket { label: "301-400", min: 301.0, max: Some(401.0) },
    PriceBucket { label: "401-500", min: 401.0, max: Some(501.0) },
    PriceBucket { label: "501-600", min: 501.0, max: Some(601.0) },
    PriceBucket { label: "601-700", min: 601.0, max: Some(701.0) },
    PriceBucket { label: "701-800", min: 701.0, max: Some(801.0) },
    PriceBucket { label: "801-900", min: 801.0, max: Some(901.0) },
    PriceBucket { label: "901-above", min: 901.0, max: None },
];

/// One bar of the chart.
#[derive(Debug, Serialize)]
pub(crate) struct BarChartEntry {
    /// The bucket label, e.g. "101-200".
    range: &'static str,
    /// The number of in-window transactions priced within the bucket.
    count: i64,
}

/// A route handler for the monthly price-range bar chart.
///
/// `month` is a required zero-based month index into the configured
/// reference year. The response lists all ten buckets in fixed order, with
/// zero counts where nothing matches.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub(crate) async fn get_bar_chart(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<BarChartEntry>>, Error> {
    let month = query.month.ok_or(Error::MissingMonth)?;
    let window = MonthWindow::from_month_index(state.reference_year, month)?;

    let connection = state.db_connection.lock().unwrap();
    let mut entries = Vec::with_capacity(PRICE_BUCKETS.len());

    for bucket in &PRICE_BUCKETS {
        let count = count_priced_in_window(window, bucket.min, bucket.max, &connection)?;
        entries.push(BarChartEntry {
            range: bucket.label,
            count,
        });
    }

    Ok(Json(entries))
}

/// Count the transactions in `window` priced in `[min, max)`, or `[min, ∞)`
/// when `max` is `None`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
fn count_priced_in_window(
    window: MonthWindow,
    min: f64,
    max: Option<f64>,
    connection: &Connection,
) -> Result<i64, Error> {
    let count = match max {
        Some(max) => connection
            .prepare(
                "SELECT COUNT(*) FROM \"transaction\"
                 WHERE sale_time >= ?1 AND sale_time < ?2 AND price >= ?3 AND price < ?4",
            )?
            .query_row((window.start, window.end, min, max), |row| row.get(0))?,
        None => connection
            .prepare(
                "SELECT COUNT(*) FROM \"transaction\"
                 WHERE sale_time >= ?1 AND sale_time < ?2 AND price >= ?3",
            )?
            .query_row((window.start, window.end, min), |row| row.get(0))?,
    };

    Ok(count)
}
