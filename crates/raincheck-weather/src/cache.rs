//! Append-only forecast cache.
//!
//! On disk: UTF-8 text, one single-key JSON object per line mapping an ISO
//! date to a raw forecast response. In memory: a date-keyed map where the
//! last-loaded line wins. Writes only ever append; stale duplicate lines
//! stay on disk until the next reload makes them irrelevant again.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::types::WeatherError;

#[derive(Debug)]
pub struct ForecastCache {
    path: PathBuf,
    entries: HashMap<String, Value>,
}

impl ForecastCache {
    /// Load the cache file at `path`, if it exists.
    ///
    /// A missing file is an empty cache. A line that fails to parse as JSON
    /// is skipped with a warning; the line itself is left untouched on disk.
    ///
    /// # Errors
    /// Returns [`WeatherError::Cache`] when the file exists but cannot be
    /// read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WeatherError> {
        let path = path.as_ref().to_path_buf();
        let mut entries = HashMap::new();

        match File::open(&path) {
            Ok(file) => {
                for (index, line) in BufReader::new(file).lines().enumerate() {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<HashMap<String, Value>>(&line) {
                        Ok(record) => {
                            // One key per line by convention; later lines
                            // overwrite earlier in-memory entries.
                            for (date, value) in record {
                                entries.insert(date, value);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Skipping malformed cache line {} in {}: {}",
                                index + 1,
                                path.display(),
                                e
                            );
                        }
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(WeatherError::Cache(e)),
        }

        tracing::debug!(
            "Loaded {} cached forecast(s) from {}",
            entries.len(),
            path.display()
        );
        Ok(Self { path, entries })
    }

    /// Cached forecast for an ISO date, if any.
    pub fn get(&self, date: &str) -> Option<&Value> {
        self.entries.get(date)
    }

    /// Append one `{date: response}` line and update the in-memory entry.
    ///
    /// The file handle is scoped to this call. Existing lines are never
    /// rewritten, so re-appending an already-cached date adds a duplicate
    /// line; only the last one counts after a reload.
    ///
    /// # Errors
    /// Returns [`WeatherError::Cache`] when the file cannot be opened or
    /// written.
    pub fn append(&mut self, date: &str, value: &Value) -> Result<(), WeatherError> {
        let mut record = serde_json::Map::new();
        record.insert(date.to_string(), value.clone());
        let line = Value::Object(record).to_string();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        self.entries.insert(date.to_string(), value.clone());
        Ok(())
    }

    /// Number of distinct dates currently cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
