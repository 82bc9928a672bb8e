use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed key the ranking table is persisted under.
pub const RANKING_STORAGE_KEY: &str = "buscaminasRankings";

/// Only the best times are kept per difficulty.
pub const MAX_RANKING_ENTRIES: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    #[serde(rename = "time")]
    pub time_secs: u32,
}

/// Best times per difficulty label, each list sorted fastest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankingTable {
    rankings: BTreeMap<String, Vec<RankingEntry>>,
}

impl RankingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranking for `label`, empty when nobody has finished that difficulty yet.
    pub fn get(&self, label: &str) -> &[RankingEntry] {
        self.rankings
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Inserts a finished game, keeping only the best [`MAX_RANKING_ENTRIES`] times.
    ///
    /// Equal times keep their insertion order. Returns the position of the new entry, or `None`
    /// when it did not make the cut.
    pub fn record(&mut self, label: &str, name: &str, time_secs: u32) -> Option<usize> {
        let entries = self.rankings.entry(label.to_owned()).or_default();
        entries.push(RankingEntry {
            name: name.to_owned(),
            time_secs,
        });
        // the stable sort puts the new entry after every other one at least as fast
        let rank = entries
            .iter()
            .filter(|entry| entry.time_secs <= time_secs)
            .count()
            - 1;

        entries.sort_by_key(|entry| entry.time_secs);
        entries.truncate(MAX_RANKING_ENTRIES);

        (rank < MAX_RANKING_ENTRIES).then_some(rank)
    }

    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Durable home of the ranking table.
///
/// Every write replaces the whole table.
pub trait RankingStore {
    fn load(&self) -> StoreResult<RankingTable>;

    fn save(&self, table: &RankingTable) -> StoreResult<()>;

    /// Loads the table, treating a missing or unreadable record as empty.
    fn load_or_default(&self) -> RankingTable {
        self.load().unwrap_or_else(|err| {
            log::warn!("Could not load ranking, starting empty: {}", err);
            RankingTable::default()
        })
    }

    /// Read-modify-write of a single result, saved before returning.
    fn record_result(
        &self,
        label: &str,
        name: &str,
        time_secs: u32,
    ) -> StoreResult<(RankingTable, Option<usize>)> {
        let mut table = self.load_or_default();
        let rank = table.record(label, name, time_secs);
        self.save(&table)?;
        Ok((table, rank))
    }
}

impl<S: RankingStore + ?Sized> RankingStore for &S {
    fn load(&self) -> StoreResult<RankingTable> {
        (**self).load()
    }

    fn save(&self, table: &RankingTable) -> StoreResult<()> {
        (**self).save(table)
    }
}

/// Keeps the serialized record in memory, as a stand-in for a real key-value store.
#[derive(Debug, Default)]
pub struct MemoryRankingStore {
    record: RefCell<Option<String>>,
}

impl MemoryRankingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an arbitrary stored record, which does not have to be valid.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: RefCell::new(Some(record.into())),
        }
    }

    pub fn record(&self) -> Option<String> {
        self.record.borrow().clone()
    }
}

impl RankingStore for MemoryRankingStore {
    fn load(&self) -> StoreResult<RankingTable> {
        match self.record.borrow().as_deref() {
            Some(json) => RankingTable::from_json(json),
            None => Ok(RankingTable::default()),
        }
    }

    fn save(&self, table: &RankingTable) -> StoreResult<()> {
        *self.record.borrow_mut() = Some(table.to_json()?);
        Ok(())
    }
}

/// Persists the ranking as a JSON file named after [`RANKING_STORAGE_KEY`].
#[derive(Clone, Debug)]
pub struct JsonFileRankingStore {
    path: PathBuf,
}

impl JsonFileRankingStore {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{RANKING_STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RankingStore for JsonFileRankingStore {
    fn load(&self) -> StoreResult<RankingTable> {
        match fs::read_to_string(&self.path) {
            Ok(json) => RankingTable::from_json(&json),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No ranking stored at {}", self.path.display());
                Ok(RankingTable::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, table: &RankingTable) -> StoreResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        // replace the whole file at once
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, table.to_json()?)?;
        fs::rename(&tmp_path, &self.path)?;
        log::debug!("Saved ranking to {}", self.path.display());
        Ok(())
    }
}

/// Formats seconds as `MM:SS`, minutes keep growing past an hour.
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
