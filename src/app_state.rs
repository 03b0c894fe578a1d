//! Implements a struct that holds the state of the REST server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;

use crate::{Error, db::initialize, pagination::PaginationConfig};

/// How long a seed fetch may take before the request is abandoned.
const SEED_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The HTTP client used to fetch the remote seed document.
    pub http_client: reqwest::Client,

    /// The URL of the remote seed document.
    pub seed_url: String,

    /// The year that month windows are anchored to.
    pub reference_year: i32,

    /// The config that controls how to page transaction listings.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the table for the
    /// transaction model, and build the HTTP client used for seeding with an
    /// explicit request timeout.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the HTTP
    /// client cannot be built.
    pub fn new(
        db_connection: Connection,
        seed_url: &str,
        reference_year: i32,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let http_client = reqwest::Client::builder()
            .timeout(SEED_FETCH_TIMEOUT)
            .build()?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            http_client,
            seed_url: seed_url.to_owned(),
            reference_year,
            pagination_config,
        })
    }
}
