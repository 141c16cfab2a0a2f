use crate::survey::io_common::ensure_parent_dir;
use crate::survey::io_csv::{read_dataset, write_dataset};
use crate::survey::*;

/// The result of an append.
#[derive(PartialEq, Debug, Clone)]
pub struct StoreOutcome {
    /// The full dataset, including the new records.
    pub dataset: HistoricalDataset,
    /// The key of the last record appended.
    pub key: String,
    /// All the keys appended, in order.
    pub keys: Vec<String>,
    pub location: PathBuf,
    pub used_fallback: bool,
}

/// The persisted dataset: a primary file, and a fallback file used when the
/// primary one cannot be written.
///
/// Every append reads both files, merges them and rewrites the whole dataset.
/// Only one writer is expected at any time.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResponseStore {
    primary: PathBuf,
    fallback: PathBuf,
}

impl ResponseStore {
    pub fn new(primary: PathBuf, fallback: PathBuf) -> ResponseStore {
        ResponseStore { primary, fallback }
    }

    /// The primary rows, followed by the rows only present in the fallback file.
    pub fn load(&self) -> SurveyResult<HistoricalDataset> {
        let mut dataset = read_dataset(&self.primary)?;
        if self.fallback != self.primary {
            let previous = read_dataset(&self.fallback)?;
            let before = dataset.len();
            dataset.merge(previous);
            if dataset.len() > before {
                info!(
                    "load: {} record(s) recovered from {}",
                    dataset.len() - before,
                    self.fallback.display()
                );
            }
        }
        Ok(dataset)
    }

    pub fn append(&self, record: RespondentRecord) -> SurveyResult<StoreOutcome> {
        self.append_all(vec![record])
    }

    pub fn append_all(&self, records: Vec<RespondentRecord>) -> SurveyResult<StoreOutcome> {
        let mut dataset = self.load()?;
        let keys: Vec<String> = records.into_iter().map(|r| dataset.push(r)).collect();
        let key = keys.last().cloned().unwrap_or_default();
        let (location, used_fallback) = self.save(&dataset)?;
        Ok(StoreOutcome {
            dataset,
            key,
            keys,
            location,
            used_fallback,
        })
    }

    fn save(&self, dataset: &HistoricalDataset) -> SurveyResult<(PathBuf, bool)> {
        let primary_err = match write_dataset(&self.primary, dataset) {
            Ok(()) => {
                info!(
                    "save: {} record(s) written to {}",
                    dataset.len(),
                    self.primary.display()
                );
                return Ok((self.primary.clone(), false));
            }
            Err(e) => e,
        };
        warn!(
            "save: could not write {}: {}. Trying {}",
            self.primary.display(),
            primary_err,
            self.fallback.display()
        );
        ensure_parent_dir(&self.fallback)
            .map_err(csv::Error::from)
            .and_then(|()| write_dataset(&self.fallback, dataset))
            .context(StorageUnavailableSnafu {
                primary: self.primary.display().to_string(),
                primary_cause: primary_err.to_string(),
                fallback: self.fallback.display().to_string(),
            })?;
        info!(
            "save: {} record(s) written to {}",
            dataset.len(),
            self.fallback.display()
        );
        Ok((self.fallback.clone(), true))
    }
}
