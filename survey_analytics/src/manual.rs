/*!

This is the long-form manual for `survey_analytics` and `vclarifi`.

## The questionnaire

Each category has two questions. Answers use the following scale:

| value | label                      |
|-------|----------------------------|
| 1     | Not at all                 |
| 2     | To a very little extent    |
| 3     | To a little extent         |
| 4     | To a moderate extent       |
| 5     | To a fairly large extent   |
| 6     | To a great extent          |
| 7     | To a very great extent     |

The score of a category is the mean of its answers. `vclarifi questions`
prints all the questions in the order expected by `--answers`.

## The dataset

Every submission is one row of a CSV file:

```text
Key,Name,Team,Place,Planning,Capital,Resources,Governance
Alice_1,Alice,Finance,Bengaluru,5.0,4.5,6.0,3.5
```

The key is the name of the respondent followed by the number of submissions
made under that name. The whole file is rewritten at each submission. If the
file cannot be written, the fallback location is used instead and the next
submission merges both files. A dataset given with `--dataset` gets its own
fallback next to it (`responses.csv` falls back to `responses.fallback.csv`).

Workbooks produced by older versions of the survey (`survey_responses.xlsx`)
can be merged into the dataset with `vclarifi import`.

## Comparisons

Records are grouped by team, by place inside each team, and by place. The
score of a group is the mean of its per-category means. Groups are listed in
alphabetical order and a tie is won by the first group in that order.

## Forecast

With at least three submissions, the next Planning score of a respondent is
forecast with an ARIMA(1,1,0) model. The category and the minimum history can
be changed in the configuration file.

## Configuration

```json
{
  "datasetPath": "/home/me/Desktop/survey_responses.csv",
  "fallbackDatasetPath": "/home/me/Documents/survey_responses.csv",
  "logoPath": "/home/me/Desktop/VTARA.png",
  "benchmark": 5.5,
  "minimumHistory": 3,
  "forecastCategory": "Planning",
  "allocation": {
    "objective": [-1, -1],
    "constraints": [[1, 2], [3, 1]],
    "limits": [7, 8]
  }
}
```

All the fields are optional.

*/
