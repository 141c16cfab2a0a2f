// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The leadership dimensions covered by the survey.
///
/// The declaration order is the questionnaire order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    Planning,
    Capital,
    Resources,
    Governance,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Planning,
        Category::Capital,
        Category::Resources,
        Category::Governance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Planning => "Planning",
            Category::Capital => "Capital",
            Category::Resources => "Resources",
            Category::Governance => "Governance",
        }
    }

    pub fn from_label(s: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .cloned()
    }
}

/// The team of a respondent.
///
/// Variants are declared in the lexicographic order of their labels, which is
/// the order used when grouping and breaking ties.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Team {
    Finance,
    #[serde(rename = "IT Department")]
    ItDepartment,
    Management,
}

impl Team {
    /// The order in which the teams are offered on the form.
    pub const FORM_ORDER: [Team; 3] = [Team::ItDepartment, Team::Management, Team::Finance];

    pub fn label(&self) -> &'static str {
        match self {
            Team::Finance => "Finance",
            Team::ItDepartment => "IT Department",
            Team::Management => "Management",
        }
    }

    pub fn from_label(s: &str) -> Option<Team> {
        Team::FORM_ORDER
            .iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .cloned()
    }
}

/// The office of a respondent. Same ordering rule as [`Team`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Place {
    Bengaluru,
    Canberra,
}

impl Place {
    pub const FORM_ORDER: [Place; 2] = [Place::Bengaluru, Place::Canberra];

    pub fn label(&self) -> &'static str {
        match self {
            Place::Bengaluru => "Bengaluru",
            Place::Canberra => "Canberra",
        }
    }

    pub fn from_label(s: &str) -> Option<Place> {
        Place::FORM_ORDER
            .iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .cloned()
    }
}

/// One average score per category.
#[derive(PartialEq, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CategoryScores {
    #[serde(rename = "Planning")]
    pub planning: f64,
    #[serde(rename = "Capital")]
    pub capital: f64,
    #[serde(rename = "Resources")]
    pub resources: f64,
    #[serde(rename = "Governance")]
    pub governance: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Planning => self.planning,
            Category::Capital => self.capital,
            Category::Resources => self.resources,
            Category::Governance => self.governance,
        }
    }

    pub fn set(&mut self, category: Category, value: f64) {
        match category {
            Category::Planning => self.planning = value,
            Category::Capital => self.capital = value,
            Category::Resources => self.resources = value,
            Category::Governance => self.governance = value,
        }
    }

    /// The mean of the four category scores.
    pub fn overall(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum::<f64>() / Category::ALL.len() as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

/// A scored survey submission.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RespondentRecord {
    pub name: String,
    pub team: Team,
    pub place: Place,
    pub scores: CategoryScores,
}

/// A record of the historical dataset, with its row key.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub key: String,
    pub record: RespondentRecord,
}

/// All the submissions ever recorded, in insertion order.
///
/// Records are only ever appended. Keys are `{name}_{n}` where `n` counts the
/// records carrying that exact name, starting at 1.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct HistoricalDataset {
    entries: Vec<DatasetEntry>,
}

impl HistoricalDataset {
    pub fn new() -> HistoricalDataset {
        HistoricalDataset {
            entries: Vec::new(),
        }
    }

    /// Rebuilds a dataset from stored entries, keeping their keys.
    pub fn from_entries(entries: Vec<DatasetEntry>) -> HistoricalDataset {
        HistoricalDataset { entries }
    }

    /// Appends a record and returns the key it was stored under.
    pub fn push(&mut self, record: RespondentRecord) -> String {
        let n = self.count_for(&record.name) + 1;
        let key = format!("{}_{}", record.name, n);
        self.entries.push(DatasetEntry {
            key: key.clone(),
            record,
        });
        key
    }

    /// Adds the entries of `other` whose keys are not already present.
    pub fn merge(&mut self, other: HistoricalDataset) {
        for entry in other.entries {
            if !self.contains_key(&entry.key) {
                self.entries.push(entry);
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn count_for(&self, name: &str) -> usize {
        self.entries.iter().filter(|e| e.record.name == name).count()
    }

    /// The scores of one respondent for one category, oldest first.
    pub fn history_for(&self, name: &str, category: Category) -> Vec<f64> {
        self.entries
            .iter()
            .filter(|e| e.record.name == name)
            .map(|e| e.record.scores.get(category))
            .collect()
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &RespondentRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ******** Errors *********

/// Errors that prevent an analytics operation from completing.
#[derive(PartialEq, Debug, Clone)]
pub enum AnalyticsError {
    /// A Likert answer outside of 1..=7.
    AnswerOutOfRange(i64),
    /// An answer that is not a number at all.
    UnreadableAnswer(String),
    /// A category was scored with no answers at all.
    EmptyCategory(Category),
    /// A submission was built before every category was answered.
    MissingCategory(Category),
    EmptyName,
    /// The series contains a NaN or an infinite value at this position.
    NonFiniteValue(usize),
    /// Not enough points to fit the model at all.
    SeriesTooShort { required: usize, found: usize },
    NotFitted,
    DimensionMismatch(String),
    Infeasible,
    Unbounded,
    NoConvergence,
}

impl Error for AnalyticsError {}

impl Display for AnalyticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyticsError::AnswerOutOfRange(x) => {
                write!(f, "answer {} is outside of the 1-7 scale", x)
            }
            AnalyticsError::UnreadableAnswer(s) => {
                write!(f, "answer {:?} is not a number between 1 and 7", s)
            }
            AnalyticsError::EmptyCategory(c) => {
                write!(f, "no answers were given for {}", c.label())
            }
            AnalyticsError::MissingCategory(c) => {
                write!(f, "the questions for {} have not been answered", c.label())
            }
            AnalyticsError::EmptyName => write!(f, "the respondent name is empty"),
            AnalyticsError::NonFiniteValue(idx) => {
                write!(f, "the series has a non-finite value at position {}", idx)
            }
            AnalyticsError::SeriesTooShort { required, found } => write!(
                f,
                "the series has {} points, at least {} are required",
                found, required
            ),
            AnalyticsError::NotFitted => write!(f, "the model has not been fitted"),
            AnalyticsError::DimensionMismatch(msg) => {
                write!(f, "inconsistent linear program: {}", msg)
            }
            AnalyticsError::Infeasible => write!(f, "the linear program has no feasible solution"),
            AnalyticsError::Unbounded => write!(f, "the linear program is unbounded"),
            AnalyticsError::NoConvergence => {
                write!(f, "the simplex method did not converge")
            }
        }
    }
}
