//! Database schema setup.

use rusqlite::Connection;

use crate::Error;

/// Create the application tables if they do not already exist.
///
/// `sale_time` stores the Unix timestamp of `date_of_sale` so that
/// month-window queries compare integers instead of datetime strings, which
/// would order incorrectly across UTC offsets.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            price REAL NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            image TEXT NOT NULL,
            sold INTEGER NOT NULL,
            date_of_sale TEXT NOT NULL,
            sale_time INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}
