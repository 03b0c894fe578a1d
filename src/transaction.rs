//! The product-transaction model and its row mapping.

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

/// The column list for queries that return whole transactions.
///
/// **Note:** [Transaction::map_row] expects columns in this exact order.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, price, description, category, image, sold, date_of_sale";

/// A product transaction as stored in the database and served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database on insert.
    pub id: TransactionId,
    /// The product title. Searchable.
    pub title: String,
    /// The product price. Non-negative.
    pub price: f64,
    /// The product description. Searchable.
    pub description: String,
    /// The product category from the seed data. Stored but not interpreted.
    pub category: String,
    /// The product image URL from the seed data. Stored but not interpreted.
    pub image: String,
    /// Whether the product has been sold.
    pub sold: bool,
    /// The date and time of the sale.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

impl Transaction {
    /// Convert a row with the columns in [TRANSACTION_COLUMNS] order into a [Transaction].
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into the corresponding rust type,
    /// or if an invalid column index was used.
    pub(crate) fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            price: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            image: row.get(5)?,
            sold: row.get(6)?,
            date_of_sale: row.get(7)?,
        })
    }
}

/// A transaction-shaped object as it appears in the remote seed document.
///
/// The seed document carries its own `id` field, which is ignored: the
/// database assigns fresh IDs on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTransaction {
    /// The product title.
    pub title: String,
    /// The product price.
    pub price: f64,
    /// The product description.
    pub description: String,
    /// The product category.
    pub category: String,
    /// The product image URL.
    pub image: String,
    /// Whether the product has been sold.
    pub sold: bool,
    /// The date and time of the sale.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}
