pub use crate::config::*;
use crate::scoring::{category_average, Likert};

/// A builder for a survey submission.
///
/// The details of the respondent are given first, then the answers of each
/// category. The record can only be built once every category is scored.
///
/// ```
/// use survey_analytics::builder::Builder;
/// use survey_analytics::{AnalyticsError, Category, Likert, Place, Team};
///
/// let mut builder = Builder::new("Alice", Team::Finance, Place::Bengaluru)?;
/// for c in Category::ALL {
///     builder.add_answers(c, &[Likert::new(5)?, Likert::new(5)?])?;
/// }
/// let record = builder.build()?;
/// assert_eq!(record.scores.planning, 5.0);
///
/// # Ok::<(), AnalyticsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    pub(crate) _name: String,
    pub(crate) _team: Team,
    pub(crate) _place: Place,
    pub(crate) _scores: Vec<(Category, f64)>,
}

impl Builder {
    pub fn new(name: &str, team: Team, place: Place) -> Result<Builder, AnalyticsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AnalyticsError::EmptyName);
        }
        Ok(Builder {
            _name: name.to_string(),
            _team: team,
            _place: place,
            _scores: Vec::new(),
        })
    }

    /// Scores the answers of one category.
    ///
    /// Answering a category again replaces the previous answers.
    pub fn add_answers(
        &mut self,
        category: Category,
        answers: &[Likert],
    ) -> Result<f64, AnalyticsError> {
        let avg = category_average(category, answers)?;
        self._scores.retain(|(c, _)| *c != category);
        self._scores.push((category, avg));
        Ok(avg)
    }

    pub fn is_complete(&self) -> bool {
        Category::ALL
            .iter()
            .all(|c| self._scores.iter().any(|(c2, _)| c2 == c))
    }

    pub fn build(&self) -> Result<RespondentRecord, AnalyticsError> {
        let mut scores = CategoryScores::default();
        for c in Category::ALL {
            let (_, avg) = self
                ._scores
                .iter()
                .find(|(c2, _)| *c2 == c)
                .ok_or(AnalyticsError::MissingCategory(c))?;
            scores.set(c, *avg);
        }
        Ok(RespondentRecord {
            name: self._name.clone(),
            team: self._team,
            place: self._place,
            scores,
        })
    }
}
