//! Stats store: schema bootstrap and CRUD for play-session records.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{Dispatch, debug, error, info, instrument, warn};

use crate::db::{ChartSeries, NewStatRecord, StatRecord, StoreError, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for play-session records.
///
/// Every operation opens its own connection and drops it before returning,
/// so the store itself holds no open handle between calls.
#[derive(Debug, Clone)]
pub struct StatsStore {
    db_path: String,
    dispatch: Option<Dispatch>,
}

impl StatsStore {
    /// Creates a store for the database at the given path without touching it.
    ///
    /// Use `":memory:"` only for throwaway checks: each operation opens a fresh
    /// connection, so an in-memory database does not survive between calls.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn new(db_path: impl AsRef<str>) -> Self {
        info!("Creating StatsStore");
        Self {
            db_path: db_path.as_ref().to_string(),
            dispatch: None,
        }
    }

    /// Creates a store and makes sure its table exists.
    ///
    /// # Errors
    ///
    /// Returns a `StorageUnavailable` [`StoreError`] if the file cannot be
    /// opened or the schema cannot be created.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn open(db_path: impl AsRef<str>) -> Result<Self, StoreError> {
        let store = Self::new(db_path);
        store.ensure_schema()?;
        Ok(store)
    }

    /// Routes this store's spans and events to `dispatch` instead of the
    /// process-wide default subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Creates the stats table if it does not exist. Never removes data.
    ///
    /// # Errors
    ///
    /// Returns a `StorageUnavailable` [`StoreError`] if the file cannot be
    /// opened or written.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.observed(|| self.run_ensure_schema())
    }

    /// Drops and recreates the stats table, deleting every record.
    ///
    /// Runs in a single transaction: a failed reset leaves the data intact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be opened or the table cannot
    /// be recreated.
    pub fn reset_all(&self) -> Result<(), StoreError> {
        self.observed(|| self.run_reset_all())
    }

    /// Inserts a record and returns its newly assigned id.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` [`StoreError`] for a blank name or negative score
    /// (nothing is written), or a storage error if the insert fails.
    pub fn add_record(&self, record: &NewStatRecord) -> Result<i32, StoreError> {
        self.observed(|| self.run_add_record(record))
    }

    /// Lists all records, most recent date first, ties broken by id descending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    pub fn list_records(&self) -> Result<Vec<StatRecord>, StoreError> {
        self.observed(|| self.run_list_records())
    }

    /// Replaces every mutable field of record `id`.
    ///
    /// Returns `false` when no record has that id; nothing is created.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` [`StoreError`] for invalid data, or a storage
    /// error if the update fails. A missing id is not an error.
    pub fn update_record(&self, id: i32, record: &NewStatRecord) -> Result<bool, StoreError> {
        self.observed(|| self.run_update_record(id, record))
    }

    /// Deletes record `id`. Returns `false` when no record has that id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    pub fn delete_record(&self, id: i32) -> Result<bool, StoreError> {
        self.observed(|| self.run_delete_record(id))
    }

    /// Returns the chart projection, oldest date first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    pub fn list_for_chart(&self) -> Result<ChartSeries, StoreError> {
        self.observed(|| self.run_list_for_chart())
    }

    fn observed<T>(&self, op: impl FnOnce() -> T) -> T {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, op),
            None => op(),
        }
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| {
                StoreError::unavailable(format!("Failed to open '{}': {}", self.db_path, e))
            })
            .inspect_err(|e| error!(error = %e, "Error connecting to database"))
    }

    #[instrument(skip(self), fields(db_path = %self.db_path))]
    fn run_ensure_schema(&self) -> Result<(), StoreError> {
        let result = self.connection().and_then(|mut conn| {
            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|e| StoreError::unavailable(format!("Failed to create schema: {}", e)))?
                .len();
            Ok(applied)
        });

        match result {
            Ok(applied) => {
                info!(applied, "Schema ready");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error initializing database");
                Err(e)
            }
        }
    }

    #[instrument(skip(self), fields(db_path = %self.db_path))]
    fn run_reset_all(&self) -> Result<(), StoreError> {
        let mut conn = self.connection()?;

        // Record the bootstrap migration first so that a table created outside
        // the harness is dropped by the revert as well.
        conn.immediate_transaction(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map_err(|e| StoreError::unavailable(format!("Failed to create schema: {}", e)))?;
            conn.revert_all_migrations(MIGRATIONS)
                .map_err(|e| StoreError::storage(format!("Failed to drop stats table: {}", e)))?;
            conn.run_pending_migrations(MIGRATIONS)
                .map_err(|e| StoreError::unavailable(format!("Failed to recreate schema: {}", e)))?;
            Ok::<_, StoreError>(())
        })
        .inspect_err(|e| error!(error = %e, "Error resetting database"))?;

        info!("Database reset");
        Ok(())
    }

    #[instrument(skip(self, record), fields(game_name = %record.game_name(), date_played = %record.date_played(), score = record.score()))]
    fn run_add_record(&self, record: &NewStatRecord) -> Result<i32, StoreError> {
        record
            .validate()
            .inspect_err(|e| warn!(error = %e, "Rejected stat"))?;
        let mut conn = self.connection()?;

        let id = diesel::insert_into(schema::stats::table)
            .values(record)
            .returning(schema::stats::id)
            .get_result::<i32>(&mut conn)
            .map_err(|e| StoreError::storage(format!("Failed to add stat: {}", e)))
            .inspect_err(|e| error!(error = %e, "Error adding stat"))?;

        info!(id, game_name = %record.game_name(), "Added new stat");
        Ok(id)
    }

    #[instrument(skip(self))]
    fn run_list_records(&self) -> Result<Vec<StatRecord>, StoreError> {
        let mut conn = self.connection()?;

        let records = schema::stats::table
            .order((schema::stats::date_played.desc(), schema::stats::id.desc()))
            .select(StatRecord::as_select())
            .load(&mut conn)
            .map_err(|e| StoreError::storage(format!("Failed to retrieve stats: {}", e)))
            .inspect_err(|e| error!(error = %e, "Error retrieving stats"))?;

        debug!(count = records.len(), "Stats loaded");
        Ok(records)
    }

    #[instrument(skip(self, record), fields(game_name = %record.game_name(), date_played = %record.date_played(), score = record.score()))]
    fn run_update_record(&self, id: i32, record: &NewStatRecord) -> Result<bool, StoreError> {
        record
            .validate()
            .inspect_err(|e| warn!(id, error = %e, "Rejected stat update"))?;
        let mut conn = self.connection()?;

        let updated = diesel::update(schema::stats::table.find(id))
            .set(record)
            .execute(&mut conn)
            .map_err(|e| StoreError::storage(format!("Failed to update stat: {}", e)))
            .inspect_err(|e| error!(error = %e, "Error updating stat"))?;

        if updated > 0 {
            info!(id, "Updated stat");
        } else {
            debug!(id, "No stat to update");
        }
        Ok(updated > 0)
    }

    #[instrument(skip(self))]
    fn run_delete_record(&self, id: i32) -> Result<bool, StoreError> {
        let mut conn = self.connection()?;

        let deleted = diesel::delete(schema::stats::table.find(id))
            .execute(&mut conn)
            .map_err(|e| StoreError::storage(format!("Failed to delete stat: {}", e)))
            .inspect_err(|e| error!(error = %e, "Error deleting stat"))?;

        if deleted > 0 {
            info!(id, "Deleted stat");
        } else {
            debug!(id, "No stat to delete");
        }
        Ok(deleted > 0)
    }

    #[instrument(skip(self))]
    fn run_list_for_chart(&self) -> Result<ChartSeries, StoreError> {
        let mut records = self.run_list_records()?;
        records.reverse();
        let series = ChartSeries::from_records(&records);
        debug!(points = series.len(), "Chart series built");
        Ok(series)
    }
}
