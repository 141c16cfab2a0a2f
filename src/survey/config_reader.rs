use crate::survey::io_common::home_dir;
use crate::survey::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BENCHMARK: f64 = 5.5;
pub const DEFAULT_MINIMUM_HISTORY: usize = 3;
const DATASET_FILE_NAME: &str = "survey_responses.csv";
const LOGO_FILE_NAME: &str = "VTARA.png";

/// The options of the configuration file. All of them are optional.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "datasetPath")]
    pub dataset_path: Option<String>,
    #[serde(rename = "fallbackDatasetPath")]
    pub fallback_dataset_path: Option<String>,
    #[serde(rename = "logoPath")]
    pub logo_path: Option<String>,
    #[serde(rename = "benchmark")]
    pub benchmark: Option<f64>,
    #[serde(rename = "minimumHistory")]
    pub minimum_history: Option<usize>,
    #[serde(rename = "forecastCategory")]
    pub forecast_category: Option<String>,
    #[serde(rename = "allocation")]
    pub allocation: Option<LinearProgram>,
}

impl SurveyConfig {
    /// Overrides the dataset location, for example from the command line.
    ///
    /// The fallback moves along with it, next to the new dataset, so the rows
    /// of another dataset are never merged in.
    pub fn with_dataset(self, dataset: Option<String>) -> SurveyConfig {
        match dataset {
            Some(p) => {
                let fallback = sibling_fallback(Path::new(&p));
                SurveyConfig {
                    dataset_path: Some(p),
                    fallback_dataset_path: Some(fallback.display().to_string()),
                    ..self
                }
            }
            None => self,
        }
    }

    pub fn dataset_path(&self) -> PathBuf {
        match &self.dataset_path {
            Some(p) => PathBuf::from(p),
            None => home_dir().join("Desktop").join(DATASET_FILE_NAME),
        }
    }

    pub fn fallback_dataset_path(&self) -> PathBuf {
        match &self.fallback_dataset_path {
            Some(p) => PathBuf::from(p),
            None => home_dir().join("Documents").join(DATASET_FILE_NAME),
        }
    }

    pub fn logo_path(&self) -> Option<PathBuf> {
        match &self.logo_path {
            Some(p) if p.is_empty() => None,
            Some(p) => Some(PathBuf::from(p)),
            None => Some(home_dir().join("Desktop").join(LOGO_FILE_NAME)),
        }
    }

    pub fn benchmark(&self) -> f64 {
        self.benchmark.unwrap_or(DEFAULT_BENCHMARK)
    }

    pub fn minimum_history(&self) -> usize {
        self.minimum_history.unwrap_or(DEFAULT_MINIMUM_HISTORY)
    }

    pub fn forecast_category(&self) -> SurveyResult<Category> {
        match self.forecast_category.as_deref() {
            None => Ok(Category::Planning),
            Some(s) => match Category::from_label(s) {
                Some(c) => Ok(c),
                None => whatever!("unknown forecast category: {}", s),
            },
        }
    }

    pub fn allocation(&self) -> LinearProgram {
        self.allocation
            .clone()
            .unwrap_or_else(LinearProgram::capital_allocation)
    }
}

// survey.csv -> survey.fallback.csv, in the same directory.
fn sibling_fallback(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "survey_responses".to_string());
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "csv".to_string());
    path.with_file_name(format!("{}.fallback.{}", stem, ext))
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}
