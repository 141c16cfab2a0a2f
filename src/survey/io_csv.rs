// Reading and writing the dataset as CSV.

use serde::{Deserialize, Serialize};

use crate::survey::*;

// One line of the dataset file. The column names follow the legacy workbook.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
struct DatasetRow {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Team")]
    team: Team,
    #[serde(rename = "Place")]
    place: Place,
    #[serde(rename = "Planning")]
    planning: f64,
    #[serde(rename = "Capital")]
    capital: f64,
    #[serde(rename = "Resources")]
    resources: f64,
    #[serde(rename = "Governance")]
    governance: f64,
}

impl DatasetRow {
    fn from_entry(entry: &DatasetEntry) -> DatasetRow {
        let r = &entry.record;
        DatasetRow {
            key: entry.key.clone(),
            name: r.name.clone(),
            team: r.team,
            place: r.place,
            planning: r.scores.planning,
            capital: r.scores.capital,
            resources: r.scores.resources,
            governance: r.scores.governance,
        }
    }

    fn into_entry(self) -> DatasetEntry {
        DatasetEntry {
            key: self.key,
            record: RespondentRecord {
                name: self.name,
                team: self.team,
                place: self.place,
                scores: CategoryScores {
                    planning: self.planning,
                    capital: self.capital,
                    resources: self.resources,
                    governance: self.governance,
                },
            },
        }
    }
}

/// Reads a dataset file. A missing file is an empty dataset.
pub fn read_dataset(path: &Path) -> SurveyResult<HistoricalDataset> {
    let path_s = path.display().to_string();
    if !path.exists() {
        debug!("read_dataset: {} does not exist", path_s);
        return Ok(HistoricalDataset::new());
    }
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context(OpeningCsvSnafu { path: &path_s })?;
    let mut entries: Vec<DatasetEntry> = Vec::new();
    for (idx, row_r) in rdr.deserialize::<DatasetRow>().enumerate() {
        // The header is the first line.
        let lineno = (idx + 2) as u64;
        let row = row_r.context(CsvLineParseSnafu {
            path: &path_s,
            lineno,
        })?;
        entries.push(row.into_entry());
    }
    debug!("read_dataset: {} rows read from {}", entries.len(), path_s);
    Ok(HistoricalDataset::from_entries(entries))
}

/// Writes the whole dataset, replacing the content of the file.
pub fn write_dataset(path: &Path, dataset: &HistoricalDataset) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    for entry in dataset.entries() {
        wtr.serialize(DatasetRow::from_entry(entry))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, planning: f64) -> RespondentRecord {
        RespondentRecord {
            name: name.to_string(),
            team: Team::ItDepartment,
            place: Place::Canberra,
            scores: CategoryScores {
                planning,
                capital: 1.0 / 3.0,
                resources: 6.5,
                governance: 7.0,
            },
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let ds = read_dataset(&dir.path().join("nothing.csv")).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("data.csv");
        let mut ds = HistoricalDataset::new();
        ds.push(record("Alice", 4.5));
        ds.push(record("Alice", 5.0));
        write_dataset(&p, &ds).unwrap();
        assert_eq!(read_dataset(&p).unwrap(), ds);

        let contents = fs::read_to_string(&p).unwrap();
        assert!(contents.starts_with("Key,Name,Team,Place,Planning,Capital,Resources,Governance"));
        assert!(contents.contains("Alice_2,Alice,IT Department,Canberra,5.0,"));
    }

    #[test]
    fn bad_rows_name_the_line() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("data.csv");
        fs::write(
            &p,
            "Key,Name,Team,Place,Planning,Capital,Resources,Governance\n\
             Bob_1,Bob,Finance,Canberra,4,4,4,4\n\
             Bob_2,Bob,Sales,Canberra,4,4,4,4\n",
        )
        .unwrap();
        match read_dataset(&p) {
            Err(SurveyError::CsvLineParse { lineno, .. }) => assert_eq!(lineno, 3),
            x => panic!("unexpected result {:?}", x),
        }
    }
}
