//! Outcomes of previous property runs.
//!
//! The run database remembers, per property name, the status and seed of the
//! latest check. [`AfterFailureMode::SameSeed`](crate::config::AfterFailureMode)
//! uses it to replay the seed of a failed run. With the `persistence` feature
//! the database can be backed by a JSON file.

use std::collections::BTreeMap;
#[cfg(feature = "persistence")]
use std::fs;
#[cfg(feature = "persistence")]
use std::io;
#[cfg(feature = "persistence")]
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

#[cfg(feature = "persistence")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "persistence")]
use crate::config::GlobalConfig;
use crate::execution::CheckStatus;

/// The recorded outcome of one property check
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "persistence", derive(Serialize, Deserialize))]
pub struct TestRun {
    /// Name of the property
    pub property: String,

    pub status: CheckStatus,

    /// Seed in the decimal form it was used with
    pub seed: String,

    /// Debug rendering of the reported sample, if any
    pub sample: Option<String>,

    /// When this run was recorded
    pub recorded_at: SystemTime,
}

impl TestRun {
    pub fn new(property: impl Into<String>, status: CheckStatus, seed: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            status,
            seed: seed.into(),
            sample: None,
            recorded_at: SystemTime::now(),
        }
    }

    pub fn with_sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = Some(sample.into());
        self
    }
}

/// Latest run per property, shared between executions
pub struct RunDatabase {
    runs: Mutex<BTreeMap<String, TestRun>>,
    #[cfg(feature = "persistence")]
    path: Option<PathBuf>,
}

impl RunDatabase {
    /// A database that lives as long as the process
    pub fn in_memory() -> Self {
        Self {
            runs: Mutex::new(BTreeMap::new()),
            #[cfg(feature = "persistence")]
            path: None,
        }
    }

    /// A database stored as JSON at `path`.
    ///
    /// A missing file starts an empty database. An unreadable or corrupt file
    /// is logged and ignored; it is overwritten on the next record.
    #[cfg(feature = "persistence")]
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let runs = match load(&path) {
            Ok(runs) => runs,
            Err(err) => {
                log::warn!("ignoring run database {}: {}", path.display(), err);
                BTreeMap::new()
            }
        };
        log::debug!("opened run database {} with {} runs", path.display(), runs.len());
        Self {
            runs: Mutex::new(runs),
            path: Some(path),
        }
    }

    /// The database named by [`GlobalConfig::database`], if any
    #[cfg(feature = "persistence")]
    pub fn from_global(global: &GlobalConfig) -> Option<Self> {
        global.database.as_ref().map(Self::open)
    }

    /// Backing file, if any
    #[cfg(feature = "persistence")]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, TestRun>> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The latest run of `property`
    pub fn previous_run(&self, property: &str) -> Option<TestRun> {
        self.lock().get(property).cloned()
    }

    /// Record `run`, replacing the previous run of the same property
    pub fn record(&self, run: TestRun) {
        let mut runs = self.lock();
        runs.insert(run.property.clone(), run);
        self.save(&runs);
    }

    /// Forget `property`; returns whether it was known
    pub fn remove(&self, property: &str) -> bool {
        let mut runs = self.lock();
        let removed = runs.remove(property).is_some();
        if removed {
            self.save(&runs);
        }
        removed
    }

    pub fn clear(&self) {
        let mut runs = self.lock();
        runs.clear();
        self.save(&runs);
    }

    /// All runs ordered by property name
    pub fn runs(&self) -> Vec<TestRun> {
        self.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[cfg(feature = "persistence")]
    fn save(&self, runs: &BTreeMap<String, TestRun>) {
        if let Some(path) = &self.path
            && let Err(err) = store(path, runs)
        {
            log::warn!("could not write run database {}: {}", path.display(), err);
        }
    }

    #[cfg(not(feature = "persistence"))]
    fn save(&self, _runs: &BTreeMap<String, TestRun>) {}
}

impl Default for RunDatabase {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(feature = "persistence")]
fn load(path: &Path) -> io::Result<BTreeMap<String, TestRun>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = fs::read_to_string(path)?;
    let runs: Vec<TestRun> = serde_json::from_str(&contents)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(runs
        .into_iter()
        .map(|run| (run.property.clone(), run))
        .collect())
}

#[cfg(feature = "persistence")]
fn store(path: &Path, runs: &BTreeMap<String, TestRun>) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let runs: Vec<&TestRun> = runs.values().collect();
    let json = serde_json::to_string_pretty(&runs)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}
