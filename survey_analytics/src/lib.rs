/*!
Scoring and analytics for Likert-scale leadership surveys.

A survey submission answers a few questions on a 1-7 scale for each of the
four leadership categories (Planning, Capital, Resources, Governance). This
crate turns those answers into category averages and runs the analytics on
top of the accumulated submissions:

- [`scoring`] and [`builder`]: from answers to a [`RespondentRecord`]
- [`aggregate`]: comparisons by team and by place
- [`forecast`]: one-step ARIMA(1,1,0) forecast of a respondent's scores
- [`allocation`]: a small linear program solved with the simplex method

```
use survey_analytics::*;

let mut ds = HistoricalDataset::new();
for (i, avg) in [4, 5, 6].iter().enumerate() {
    let mut builder = builder::Builder::new("Alice", Team::Finance, Place::Bengaluru)?;
    for c in Category::ALL {
        builder.add_answers(c, &[Likert::new(*avg)?])?;
    }
    let key = ds.push(builder.build()?);
    assert_eq!(key, format!("Alice_{}", i + 1));
}

let history = ds.history_for("Alice", Category::Planning);
assert!(matches!(
    forecast_next(&history, 3)?,
    ForecastOutcome::Predicted { .. }
));
assert_eq!(compare(&ds).by_team.best(), Some("Finance"));

# Ok::<(), AnalyticsError>(())
```
*/
mod config;

pub mod aggregate;
pub mod allocation;
pub mod builder;
pub mod forecast;
pub mod manual;
pub mod scoring;

pub use crate::aggregate::{
    compare, Comparison, ComparisonReport, ComparisonSummary, TeamPlacesReport,
};
pub use crate::allocation::{Allocation, LinearProgram, VariableBound};
pub use crate::config::*;
pub use crate::forecast::{forecast_next, Arima110, ForecastOutcome, Predictor};
pub use crate::scoring::{category_average, Likert};
