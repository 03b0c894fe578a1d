//! Fetching the remote seed document and replacing the database contents.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, transaction::SeedTransaction};

/// The public seed document the database is initialized from when no
/// override is given on the command line.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// A route handler for replacing the database contents with the seed data.
///
/// Responds with the plain-text confirmation existing clients expect; the
/// inserted count goes to the log instead.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub(crate) async fn get_init(State(state): State<AppState>) -> Result<Response, Error> {
    let transactions = fetch_seed(&state.http_client, &state.seed_url).await?;

    let count = {
        let connection = state.db_connection.lock().unwrap();
        replace_transactions(&transactions, &connection)?
    };

    tracing::info!("Seeded the database with {count} transactions from {}", state.seed_url);

    Ok("Database initialized with seed data".into_response())
}

/// Fetch the seed document from `url` and decode it as a transaction list.
///
/// # Errors
/// Returns an [Error::SeedFetch] if the resource is unreachable, responds
/// with an error status, or does not decode as a JSON array of transactions.
pub(crate) async fn fetch_seed(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<SeedTransaction>, Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    let transactions = response.json::<Vec<SeedTransaction>>().await?;

    Ok(transactions)
}

/// Replace every row in the transaction table with `transactions`.
///
/// The delete and the bulk insert run inside a single database transaction,
/// so readers never observe a partially seeded table. Fresh IDs are assigned
/// on insert.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub(crate) fn replace_transactions(
    transactions: &[SeedTransaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    tx.execute("DELETE FROM \"transaction\"", ())?;

    // Prepare the insert statement once for reuse
    let mut stmt = tx.prepare(
        "INSERT INTO \"transaction\"
            (title, price, description, category, image, sold, date_of_sale, sale_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    for transaction in transactions {
        stmt.execute((
            &transaction.title,
            transaction.price,
            &transaction.description,
            &transaction.category,
            &transaction.image,
            transaction.sold,
            transaction.date_of_sale,
            transaction.date_of_sale.unix_timestamp(),
        ))?;
    }

    drop(stmt);

    tx.commit()?;
    Ok(transactions.len())
}
