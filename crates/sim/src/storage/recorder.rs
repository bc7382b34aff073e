//! Writes run metadata, trial outcomes and tables to SQLite.

use crate::errors::DatabaseError;
use crate::evolution::RecombinationTable;
use crate::simulation::{Configuration, TrialOutcome};
use crate::storage::Database;
use crate::storage::types::{encode_frequencies, encode_table};
use hapdyn_codec::CodecStrategy;
use rusqlite::params;
use std::path::Path;

/// Counters for what a [`Recorder`] has written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub trials_recorded: usize,
    pub trajectory_points: usize,
    pub tables_stored: usize,
    /// Encoded payload bytes written
    pub bytes_written: usize,
}

/// Synchronous recorder. Each trial is written in its own transaction, so a
/// crash never leaves a trial half-recorded.
#[derive(Debug)]
pub struct Recorder {
    db: Database,
    codec: CodecStrategy,
    stats: RecorderStats,
}

impl Recorder {
    /// Open (or create) `db_path` and store the run's configuration.
    ///
    /// `seed` is the resolved run seed, which may differ from the configured
    /// one when the configuration leaves it unset.
    pub fn new(
        db_path: impl AsRef<Path>,
        config: &Configuration,
        seed: u64,
    ) -> Result<Self, DatabaseError> {
        let mut db = Database::open(db_path)?;
        let codec = config.execution.codec;

        let config_json =
            serde_json::to_string(config).map_err(|e| DatabaseError::Serialization(e.to_string()))?;
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let meta_pairs = [
            ("loci", config.model.loci.to_string()),
            ("trials", config.execution.trials.to_string()),
            ("seed", seed.to_string()),
            ("fitness", config.model.fitness.name().to_string()),
            ("mating", config.model.mating.to_string()),
            ("codec", codec.to_string()),
            ("full_config_json", config_json),
            ("created_at", created_at.to_string()),
        ];

        let tx = db.transaction()?;
        {
            let mut stmt = tx
                .prepare("INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)")
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            for (k, v) in meta_pairs {
                stmt.execute(params![k, v])
                    .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            }
        }
        tx.commit()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        Ok(Self {
            db,
            codec,
            stats: RecorderStats::default(),
        })
    }

    /// Store one trial and its trajectory.
    pub fn record_trial(&mut self, outcome: &TrialOutcome) -> Result<(), DatabaseError> {
        let codec = self.codec;
        let final_blob = encode_frequencies(&outcome.final_frequencies, codec)?;
        let points = outcome
            .trajectory
            .iter()
            .map(|r| Ok((r, encode_frequencies(&r.frequencies, codec)?)))
            .collect::<Result<Vec<_>, DatabaseError>>()?;

        let mut bytes = final_blob.len();
        let tx = self.db.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO trials
             (trial, seed, generations, converged, final_distance, mean_fitness, ld, frequencies)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                outcome.trial as i64,
                // SQLite integers are signed; the bit pattern is kept.
                outcome.seed as i64,
                outcome.generations as i64,
                outcome.converged,
                outcome.final_distance,
                outcome.mean_fitness,
                outcome.linkage_disequilibrium(),
                final_blob,
            ],
        )
        .map_err(|e| DatabaseError::Insert(e.to_string()))?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO trajectory
                     (trial, generation, mean_fitness, ld, frequencies)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            for (record, blob) in &points {
                stmt.execute(params![
                    outcome.trial as i64,
                    record.generation as i64,
                    record.mean_fitness,
                    record.ld,
                    blob,
                ])
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
                bytes += blob.len();
            }
        }
        tx.commit()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        self.stats.trials_recorded += 1;
        self.stats.trajectory_points += points.len();
        self.stats.bytes_written += bytes;
        tracing::debug!(trial = outcome.trial, points = points.len(), bytes, "recorded trial");
        Ok(())
    }

    /// Store a built table for later runs with the same map.
    pub fn store_table(&mut self, table: &RecombinationTable) -> Result<(), DatabaseError> {
        let data = encode_table(table, self.codec)?;
        let map = serde_json::to_string(table.map().fractions())
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO tables (loci, map, codec, data) VALUES (?1, ?2, ?3, ?4)",
                params![
                    table.space().loci() as i64,
                    map,
                    self.codec.to_string(),
                    data
                ],
            )
            .map_err(|e| DatabaseError::Insert(e.to_string()))?;
        self.stats.tables_stored += 1;
        self.stats.bytes_written += data.len();
        Ok(())
    }

    pub fn codec(&self) -> CodecStrategy {
        self.codec
    }

    pub fn stats(&self) -> &RecorderStats {
        &self.stats
    }

    /// Flush and close the underlying database.
    pub fn close(self) -> Result<RecorderStats, DatabaseError> {
        self.db.close()?;
        Ok(self.stats)
    }
}
