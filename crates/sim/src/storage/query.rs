//! Query interface for reading recorded runs.

use crate::errors::DatabaseError;
use crate::evolution::RecombinationTable;
use crate::simulation::Configuration;
use crate::storage::{Database, DatabaseStats};
use crate::storage::types::{TrajectoryPoint, TrialRecord, decode_frequencies, decode_table};
use hapdyn_codec::CodecStrategy;
use rusqlite::{OptionalExtension, Row, params};
use std::collections::HashMap;

/// Query builder for recorded simulation data.
pub struct QueryBuilder {
    db: Database,
}

impl QueryBuilder {
    /// Open a database for querying.
    pub fn new(db_path: impl AsRef<std::path::Path>) -> Result<Self, DatabaseError> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    /// Get raw metadata value by key.
    pub fn get_metadata_value(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT value FROM metadata WHERE key = ?1")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        stmt.query_row(params![key], |row| row.get(0))
            .optional()
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Get all metadata as a map.
    pub fn get_metadata(&self) -> Result<HashMap<String, String>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT key, value FROM metadata")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut meta = HashMap::new();
        for row in rows {
            let (k, v): (String, String) = row.map_err(|e| DatabaseError::Query(e.to_string()))?;
            meta.insert(k, v);
        }
        Ok(meta)
    }

    /// The stored configuration of the run.
    pub fn get_config(&self) -> Result<Configuration, DatabaseError> {
        let json = self
            .get_metadata_value("full_config_json")?
            .ok_or_else(|| DatabaseError::Query("no configuration recorded".into()))?;
        serde_json::from_str(&json).map_err(|e| DatabaseError::Serialization(e.to_string()))
    }

    /// The resolved run seed.
    pub fn get_seed(&self) -> Result<Option<u64>, DatabaseError> {
        self.get_metadata_value("seed")?
            .map(|s| {
                s.parse()
                    .map_err(|e| DatabaseError::Serialization(format!("seed {s}: {e}")))
            })
            .transpose()
    }

    /// Codec used for payloads; older files without the key use the default.
    pub fn codec(&self) -> Result<CodecStrategy, DatabaseError> {
        match self.get_metadata_value("codec")? {
            Some(s) => s.parse().map_err(DatabaseError::Serialization),
            None => Ok(CodecStrategy::default()),
        }
    }

    /// All recorded trials, ordered by trial id.
    pub fn get_trials(&self) -> Result<Vec<TrialRecord>, DatabaseError> {
        let codec = self.codec()?;
        let mut stmt = self
            .db
            .connection()
            .prepare(
                "SELECT trial, seed, generations, converged, final_distance, mean_fitness, ld, frequencies
                 FROM trials ORDER BY trial",
            )
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], raw_trial)
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut trials = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| DatabaseError::Query(e.to_string()))?;
            trials.push(raw.decode(codec)?);
        }
        Ok(trials)
    }

    /// One recorded trial.
    pub fn get_trial(&self, trial: usize) -> Result<Option<TrialRecord>, DatabaseError> {
        let codec = self.codec()?;
        let raw = self
            .db
            .connection()
            .query_row(
                "SELECT trial, seed, generations, converged, final_distance, mean_fitness, ld, frequencies
                 FROM trials WHERE trial = ?1",
                params![trial as i64],
                raw_trial,
            )
            .optional()
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        raw.map(|r| r.decode(codec)).transpose()
    }

    /// Recorded generations of one trial, ordered by generation.
    pub fn get_trajectory(&self, trial: usize) -> Result<Vec<TrajectoryPoint>, DatabaseError> {
        let codec = self.codec()?;
        let mut stmt = self
            .db
            .connection()
            .prepare(
                "SELECT generation, mean_fitness, ld, frequencies
                 FROM trajectory WHERE trial = ?1 ORDER BY generation",
            )
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map(params![trial as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)? as usize,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, Vec<u8>>(3)?,
                ))
            })
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut points = Vec::new();
        for row in rows {
            let (generation, mean_fitness, ld, blob) =
                row.map_err(|e| DatabaseError::Query(e.to_string()))?;
            points.push(TrajectoryPoint {
                trial,
                generation,
                mean_fitness,
                ld,
                frequencies: decode_frequencies(&blob, codec)?,
            });
        }
        Ok(points)
    }

    /// A stored table for `fractions`, if one was recorded.
    pub fn load_table(&self, fractions: &[f64]) -> Result<Option<RecombinationTable>, DatabaseError> {
        let map =
            serde_json::to_string(fractions).map_err(|e| DatabaseError::Serialization(e.to_string()))?;
        let row = self
            .db
            .connection()
            .query_row(
                "SELECT codec, data FROM tables WHERE loci = ?1 AND map = ?2",
                params![(fractions.len() + 1) as i64, map],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?)),
            )
            .optional()
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        row.map(|(codec, data)| {
            let codec: CodecStrategy = codec.parse().map_err(DatabaseError::Serialization)?;
            decode_table(&data, codec)
        })
        .transpose()
    }

    /// `(loci, fractions)` of every stored table.
    pub fn list_tables(&self) -> Result<Vec<(usize, Vec<f64>)>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT loci, map FROM tables ORDER BY loci, map")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)? as usize, row.get::<_, String>(1)?))
            })
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut tables = Vec::new();
        for row in rows {
            let (loci, map) = row.map_err(|e| DatabaseError::Query(e.to_string()))?;
            let fractions: Vec<f64> = serde_json::from_str(&map)
                .map_err(|e| DatabaseError::Serialization(e.to_string()))?;
            tables.push((loci, fractions));
        }
        Ok(tables)
    }

    /// Row counts of the data tables.
    pub fn stats(&self) -> Result<DatabaseStats, DatabaseError> {
        self.db.stats()
    }

    pub fn close(self) -> Result<(), DatabaseError> {
        self.db.close()
    }
}

/// A `trials` row before its payload is decoded.
struct RawTrial {
    trial: usize,
    seed: u64,
    generations: usize,
    converged: bool,
    final_distance: f64,
    mean_fitness: f64,
    ld: f64,
    blob: Vec<u8>,
}

fn raw_trial(row: &Row<'_>) -> rusqlite::Result<RawTrial> {
    Ok(RawTrial {
        trial: row.get::<_, i64>(0)? as usize,
        seed: row.get::<_, i64>(1)? as u64,
        generations: row.get::<_, i64>(2)? as usize,
        converged: row.get(3)?,
        final_distance: row.get(4)?,
        mean_fitness: row.get(5)?,
        ld: row.get(6)?,
        blob: row.get(7)?,
    })
}

impl RawTrial {
    fn decode(self, codec: CodecStrategy) -> Result<TrialRecord, DatabaseError> {
        Ok(TrialRecord {
            trial: self.trial,
            seed: self.seed,
            generations: self.generations,
            converged: self.converged,
            final_distance: self.final_distance,
            mean_fitness: self.mean_fitness,
            ld: self.ld,
            final_frequencies: decode_frequencies(&self.blob, codec)?,
        })
    }
}
