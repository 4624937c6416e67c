// One-shot import of initial tasks from an external source

use crate::jsonl;
use crate::models::RawRecord;
use crate::store::{self, SharedStore, TaskStore};
use eyre::{Context, Result, eyre};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use tracing::{error, info};

/// Public demo API serving `{userId, id, title, completed}` records
pub const DEFAULT_SEED_URL: &str = "https://jsonplaceholder.typicode.com/todos";

/// Somewhere initial records can be read from
pub trait SeedSource: Send {
    /// Read the full record sequence; the store applies the cap
    fn fetch(&self) -> Result<Vec<RawRecord>>;

    /// Short description for log lines
    fn describe(&self) -> String;
}

/// Seed source backed by a single HTTP GET returning a JSON array
pub struct HttpSeedSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SeedSource for HttpSeedSource {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .wrap_err_with(|| format!("Failed to fetch seed records from {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(eyre!("Seed source {} returned HTTP {}", self.url, status));
        }

        response
            .json::<Vec<RawRecord>>()
            .wrap_err("Failed to parse seed response")
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Seed source backed by a local JSONL file, one record per line
pub struct JsonlSeedSource {
    path: PathBuf,
}

impl JsonlSeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeedSource for JsonlSeedSource {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        jsonl::read_jsonl(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Runs a single best-effort seed attempt
///
/// Failures are logged and swallowed; the store keeps whatever it held.
pub struct SeedLoader {
    source: Box<dyn SeedSource>,
}

impl SeedLoader {
    pub fn new(source: Box<dyn SeedSource>) -> Self {
        Self { source }
    }

    /// Fetch and seed `store`, returning the number of tasks loaded
    ///
    /// Returns `None` when the fetch failed; the store is not touched then.
    pub fn load(&self, store: &mut TaskStore) -> Option<usize> {
        let records = self.fetch()?;
        Some(store.seed(records))
    }

    /// Run the load on a background thread
    ///
    /// The store lock is only taken once the records are in hand, so the
    /// store stays usable while the fetch is in flight.
    pub fn spawn(self, shared: SharedStore) -> JoinHandle<Option<usize>> {
        thread::spawn(move || {
            let records = self.fetch()?;
            match store::lock(&shared) {
                Ok(mut guard) => Some(guard.seed(records)),
                Err(e) => {
                    error!(error = %e, "Failed to apply seed records");
                    None
                }
            }
        })
    }

    fn fetch(&self) -> Option<Vec<RawRecord>> {
        let source = self.source.describe();
        match self.source.fetch() {
            Ok(records) => {
                info!(source = %source, count = records.len(), "Fetched seed records");
                Some(records)
            }
            Err(e) => {
                error!(source = %source, error = ?e, "Failed to fetch tasks");
                None
            }
        }
    }
}
