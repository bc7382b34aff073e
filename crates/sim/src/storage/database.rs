//! Low-level database operations and schema management.

pub use crate::errors::DatabaseError;
use rusqlite::{Connection, Transaction};
use std::path::Path;

/// Database connection wrapper with schema management.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    db_path: String,
}

impl Database {
    /// Open (or create) a database at the specified path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let conn =
            Connection::open(&path_str).map_err(|e| DatabaseError::Connection(e.to_string()))?;

        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA journal_mode = WAL;
             PRAGMA temp_store = MEMORY;",
        )
        .map_err(|e| DatabaseError::Initialization(e.to_string()))?;

        let mut db = Self {
            conn,
            db_path: path_str,
        };

        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&mut self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "-- Configuration items
                CREATE TABLE IF NOT EXISTS metadata (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                -- One row per finished trial
                CREATE TABLE IF NOT EXISTS trials (
                    trial INTEGER PRIMARY KEY,
                    seed INTEGER NOT NULL,
                    generations INTEGER NOT NULL,
                    converged INTEGER NOT NULL,
                    final_distance REAL NOT NULL,
                    mean_fitness REAL NOT NULL,
                    ld REAL NOT NULL,
                    frequencies BLOB NOT NULL
                );

                -- Recorded generations
                CREATE TABLE IF NOT EXISTS trajectory (
                    trial INTEGER NOT NULL,
                    generation INTEGER NOT NULL,
                    mean_fitness REAL NOT NULL,
                    ld REAL NOT NULL,
                    frequencies BLOB NOT NULL,
                    PRIMARY KEY (trial, generation)
                );

                -- Encoded recombination tables keyed by locus count and map
                CREATE TABLE IF NOT EXISTS tables (
                    loci INTEGER NOT NULL,
                    map TEXT NOT NULL,
                    codec TEXT NOT NULL,
                    data BLOB NOT NULL,
                    PRIMARY KEY (loci, map)
                );

                CREATE INDEX IF NOT EXISTS idx_trajectory_trial ON trajectory(trial);",
            )
            .map_err(|e| DatabaseError::Initialization(e.to_string()))?;

        Ok(())
    }

    /// Begin a transaction for batched operations.
    pub fn transaction(&mut self) -> Result<Transaction<'_>, DatabaseError> {
        self.conn
            .transaction()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Close the database and clean up WAL files.
    pub fn close(self) -> Result<(), DatabaseError> {
        if let Err(e) = self.conn.execute_batch(
            "PRAGMA wal_checkpoint(TRUNCATE);
             PRAGMA journal_mode = DELETE;",
        ) {
            tracing::warn!("failed to checkpoint WAL: {e}");
        }

        self.conn
            .close()
            .map_err(|(_conn, e)| DatabaseError::Close(e.to_string()))?;

        for suffix in &["-wal", "-shm"] {
            let fname = format!("{}{}", self.db_path, suffix);
            match std::fs::remove_file(&fname) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    tracing::warn!("failed to remove {fname}: {e}");
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Row counts of the data tables.
    pub fn stats(&self) -> Result<DatabaseStats, DatabaseError> {
        let count = |table: &str| -> Result<usize, DatabaseError> {
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get::<_, i64>(0)
                })
                .map(|n| n as usize)
                .map_err(|e| DatabaseError::Query(e.to_string()))
        };

        Ok(DatabaseStats {
            trials: count("trials")?,
            trajectory_points: count("trajectory")?,
            tables: count("tables")?,
        })
    }
}

/// Database statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub trials: usize,
    pub trajectory_points: usize,
    pub tables: usize,
}
