use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_analytics::builder::Builder;
use survey_analytics::*;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::survey::config_reader::*;
use crate::survey::session::Session;
use crate::survey::store::ResponseStore;

pub mod config_reader;
pub mod io_common;
mod io_csv;
mod io_xlsx;
pub mod prompt;
pub mod render;
pub mod session;
pub mod store;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening dataset {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of dataset {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: u64,
    },
    #[snafu(display(
        "Could not save the dataset to {primary} ({primary_cause}) nor to {fallback}"
    ))]
    StorageUnavailable {
        source: csv::Error,
        primary: String,
        primary_cause: String,
        fallback: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook has no worksheet or no header row"))]
    EmptyExcel {},
    #[snafu(display("Worksheet {name} not found"))]
    MissingWorksheet { name: String },
    #[snafu(display("Column {name} not found in the header row"))]
    MissingColumn { name: String },
    #[snafu(display("Unexpected cell on line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Unknown team {value:?} on line {lineno}"))]
    UnknownTeam { value: String, lineno: u64 },
    #[snafu(display("Unknown place {value:?} on line {lineno}"))]
    UnknownPlace { value: String, lineno: u64 },
    #[snafu(display("Unknown {field} {value:?}, expected one of: {expected}"))]
    UnknownDetail {
        field: String,
        value: String,
        expected: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson { source: io::Error, path: String },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput { source: io::Error, path: String },
    #[snafu(display("Error reading the answers"))]
    Prompt { source: io::Error },
    #[snafu(display("{source}"))]
    Analytics { source: AnalyticsError },
    #[snafu(display("Invalid answer {value:?}: {source}"))]
    InvalidAnswer {
        source: AnalyticsError,
        value: String,
    },
    #[snafu(display("Difference detected between the computed summary and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// Where the JSON summary goes, and what it is checked against.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct OutputOptions {
    pub out: Option<String>,
    pub reference: Option<String>,
}

/// A submission as it was stored.
#[derive(PartialEq, Debug, Clone)]
pub struct Submission {
    pub key: String,
    pub record: RespondentRecord,
    pub location: PathBuf,
    pub used_fallback: bool,
}

/// Everything shown to a respondent after a submission (or on request).
///
/// Each section carries its own outcome: a failure in one of them does not
/// prevent the others from being computed.
#[derive(PartialEq, Debug, Clone)]
pub struct Report {
    pub respondent: String,
    pub submission: Option<Submission>,
    pub dataset_size: usize,
    pub benchmark: f64,
    pub forecast_category: Category,
    pub forecast: Result<ForecastOutcome, AnalyticsError>,
    pub allocation: Result<Allocation, AnalyticsError>,
    pub comparisons: ComparisonSummary,
}

pub fn build_report(
    config: &SurveyConfig,
    dataset: &HistoricalDataset,
    respondent: &str,
    submission: Option<Submission>,
) -> SurveyResult<Report> {
    let forecast_category = config.forecast_category()?;
    let history = dataset.history_for(respondent, forecast_category);
    debug!(
        "build_report: {} history for {}: {:?}",
        forecast_category.label(),
        respondent,
        history
    );
    let forecast = forecast_next(&history, config.minimum_history());
    if let Err(e) = &forecast {
        warn!("build_report: forecast failed: {}", e);
    }
    let allocation = config.allocation().solve();
    if let Err(e) = &allocation {
        warn!("build_report: allocation failed: {}", e);
    }
    let comparisons = compare(dataset);
    Ok(Report {
        respondent: respondent.to_string(),
        submission,
        dataset_size: dataset.len(),
        benchmark: config.benchmark(),
        forecast_category,
        forecast,
        allocation,
        comparisons,
    })
}

/// Scores the answers of the current respondent, stores the record and builds the report.
pub fn submit(
    config: &SurveyConfig,
    session: &mut Session,
    answers: &[(Category, Vec<Likert>)],
) -> SurveyResult<Report> {
    let mut builder: Builder = session.builder()?;
    for (c, xs) in answers {
        builder.add_answers(*c, xs).context(AnalyticsSnafu {})?;
    }
    let record = builder.build().context(AnalyticsSnafu {})?;
    info!("submit: record {:?}", record);

    let store = ResponseStore::new(config.dataset_path(), config.fallback_dataset_path());
    let outcome = store.append(record.clone())?;
    session.record_submission(record.clone());

    let name = record.name.clone();
    let submission = Submission {
        key: outcome.key,
        record,
        location: outcome.location,
        used_fallback: outcome.used_fallback,
    };
    build_report(config, &outcome.dataset, &name, Some(submission))
}

pub fn build_summary_js(report: &Report) -> JSValue {
    let submission = match &report.submission {
        Some(s) => json!({
            "key": s.key,
            "team": s.record.team,
            "place": s.record.place,
            "scores": s.record.scores,
        }),
        None => JSValue::Null,
    };
    let forecast = match &report.forecast {
        Ok(x) => json!(x),
        Err(e) => json!({"status": "error", "message": e.to_string()}),
    };
    let allocation = match &report.allocation {
        Ok(x) => json!({"status": "solved", "values": x.values, "objective": x.objective}),
        Err(e) => json!({"status": "error", "message": e.to_string()}),
    };
    json!({
        "respondent": report.respondent,
        "submission": submission,
        "datasetSize": report.dataset_size,
        "forecast": {"category": report.forecast_category, "outcome": forecast},
        "allocation": allocation,
        "comparisons": report.comparisons,
    })
}

/// Writes the summary to the requested location and checks it against the reference.
pub fn write_summary(report: &Report, output: &OutputOptions) -> SurveyResult<()> {
    let result_js = build_summary_js(report);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match output.out.as_deref() {
        Some("stdout") => {
            println!("{}", pretty_js_stats);
        }
        Some("") | None => {}
        Some(path) => {
            info!("write_summary: writing summary to {}", path);
            fs::write(path, &pretty_js_stats).context(WritingOutputSnafu { path })?;
        }
    }

    if let Some(summary_p) = &output.reference {
        check_reference(&pretty_js_stats, summary_p)?;
    }
    Ok(())
}

fn check_reference(pretty_js_stats: &str, summary_p: &str) -> SurveyResult<()> {
    let contents = fs::read_to_string(summary_p).context(OpeningJsonSnafu { path: summary_p })?;
    let summary_ref: JSValue =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu { path: summary_p }.fail();
    }
    Ok(())
}

fn check_logo(config: &SurveyConfig) {
    match config.logo_path() {
        Some(p) if p.exists() => info!("Using logo {}", p.display()),
        Some(p) => warn!("Logo not found at {}", p.display()),
        None => debug!("No logo configured"),
    }
}

pub fn run_questions() {
    print!("{}", render::render_questions());
}

pub fn run_submit(
    config: &SurveyConfig,
    name: &str,
    team: &str,
    place: &str,
    answers: Option<Vec<String>>,
    output: &OutputOptions,
) -> SurveyResult<()> {
    check_logo(config);
    let mut session = Session::new();
    session.confirm(name, team, place)?;

    let report = match answers {
        Some(values) => {
            let parsed = prompt::parse_answers(&values)?;
            let report = submit(config, &mut session, &parsed)?;
            print!("{}", render::render_report(&report));
            report
        }
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut input = stdin.lock();
            let mut out = stdout.lock();
            run_interactive(config, &mut session, &mut input, &mut out)?
        }
    };
    info!(
        "run_submit: {} submission(s) in this session for {:?}",
        session.submissions().len(),
        session.respondent()
    );
    write_summary(&report, output)
}

/// Asks the questions until the respondent stops submitting. Returns the last report.
pub fn run_interactive<R: BufRead, W: Write>(
    config: &SurveyConfig,
    session: &mut Session,
    input: &mut R,
    out: &mut W,
) -> SurveyResult<Report> {
    loop {
        let answers = prompt::ask_answers(input, out)?;
        let report = submit(config, session, &answers)?;
        write!(out, "{}", render::render_report(&report)).context(PromptSnafu {})?;
        match prompt::ask_yes_no(input, out, "Submit the survey again?") {
            Ok(true) => {}
            Ok(false) => return Ok(report),
            // The record is already stored: the end of the input means no.
            Err(SurveyError::Prompt { source })
                if source.kind() == io::ErrorKind::UnexpectedEof =>
            {
                debug!("run_interactive: end of input, stopping");
                return Ok(report);
            }
            Err(e) => return Err(e),
        }
    }
}

pub fn run_report(config: &SurveyConfig, name: &str, output: &OutputOptions) -> SurveyResult<()> {
    check_logo(config);
    let store = ResponseStore::new(config.dataset_path(), config.fallback_dataset_path());
    let dataset = store.load()?;
    let report = build_report(config, &dataset, name.trim(), None)?;
    print!("{}", render::render_report(&report));
    write_summary(&report, output)
}

pub fn run_import(
    config: &SurveyConfig,
    input: &str,
    worksheet_name: Option<&str>,
) -> SurveyResult<()> {
    let records = io_xlsx::read_workbook(Path::new(input), worksheet_name)?;
    info!("run_import: {} records read from {}", records.len(), input);
    let store = ResponseStore::new(config.dataset_path(), config.fallback_dataset_path());
    let outcome = store.append_all(records)?;
    println!(
        "Imported {} record(s) from {}: the dataset at {} now has {} record(s).",
        outcome.keys.len(),
        input,
        outcome.location.display(),
        outcome.dataset.len()
    );
    Ok(())
}

pub fn run_allocate(config: &SurveyConfig) -> SurveyResult<()> {
    let allocation = config.allocation().solve();
    print!("{}", render::render_allocation(&allocation));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn likert(xs: &[i64]) -> Vec<Likert> {
        xs.iter().map(|x| Likert::new(*x).unwrap()).collect()
    }

    fn answers_with_planning(planning: i64) -> Vec<(Category, Vec<Likert>)> {
        Category::ALL
            .iter()
            .map(|c| match c {
                Category::Planning => (*c, likert(&[planning, planning])),
                _ => (*c, likert(&[5, 5])),
            })
            .collect()
    }

    fn test_config(dir: &Path) -> SurveyConfig {
        SurveyConfig {
            dataset_path: Some(dir.join("survey_responses.csv").display().to_string()),
            fallback_dataset_path: Some(dir.join("backup/survey_responses.csv").display().to_string()),
            ..SurveyConfig::default()
        }
    }

    #[test]
    fn alice_end_to_end() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let mut session = Session::new();
        session.confirm("Alice", "Finance", "Bengaluru").unwrap();

        let first = submit(&config, &mut session, &answers_with_planning(4)).unwrap();
        let sub = first.submission.as_ref().unwrap();
        assert_eq!(sub.key, "Alice_1");
        assert_eq!(sub.record.scores.planning, 4.0);
        assert!(!sub.used_fallback);
        assert_eq!(
            first.forecast,
            Ok(ForecastOutcome::NeedMoreHistory { missing: 2 })
        );

        let store = ResponseStore::new(config.dataset_path(), config.fallback_dataset_path());
        assert_eq!(store.load().unwrap().len(), 1);

        let mut session = Session::new();
        session.confirm("Alice", "Finance", "Bengaluru").unwrap();
        submit(&config, &mut session, &answers_with_planning(5)).unwrap();
        let third = submit(&config, &mut session, &answers_with_planning(6)).unwrap();
        assert_eq!(session.submissions().len(), 2);
        assert_eq!(third.submission.as_ref().unwrap().key, "Alice_3");
        assert_eq!(third.dataset_size, 3);
        match third.forecast {
            Ok(ForecastOutcome::Predicted { value, history }) => {
                assert_eq!(history, 3);
                assert!((value - 6.5).abs() < 1e-9);
            }
            x => panic!("unexpected forecast {:?}", x),
        }
        assert!(third.allocation.is_ok());
        assert_eq!(third.comparisons.by_team.best(), Some("Finance"));
    }

    #[test]
    fn falls_back_when_primary_is_not_writable() {
        let dir = tempdir().unwrap();
        let config = SurveyConfig {
            dataset_path: Some(
                dir.path()
                    .join("missing/dir/survey_responses.csv")
                    .display()
                    .to_string(),
            ),
            fallback_dataset_path: Some(dir.path().join("fallback.csv").display().to_string()),
            ..SurveyConfig::default()
        };
        let mut session = Session::new();
        session.confirm("Bob", "Management", "Canberra").unwrap();
        let r1 = submit(&config, &mut session, &answers_with_planning(3)).unwrap();
        let s1 = r1.submission.unwrap();
        assert!(s1.used_fallback);
        assert_eq!(s1.location, dir.path().join("fallback.csv"));

        // The fallback rows are merged back on the next submission.
        let r2 = submit(&config, &mut session, &answers_with_planning(4)).unwrap();
        assert_eq!(r2.dataset_size, 2);
        assert_eq!(r2.submission.unwrap().key, "Bob_2");
    }

    #[test]
    fn dataset_override_ignores_the_configured_fallback() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let mut session = Session::new();
        session.confirm("Zed", "Finance", "Canberra").unwrap();
        // Leaves a row in the configured fallback file.
        let old = ResponseStore::new(
            dir.path().join("missing/survey_responses.csv"),
            config.fallback_dataset_path(),
        );
        let mut b = session.builder().unwrap();
        for (c, xs) in answers_with_planning(5) {
            b.add_answers(c, &xs).unwrap();
        }
        assert!(old.append(b.build().unwrap()).unwrap().used_fallback);

        let fresh = dir.path().join("fresh.csv");
        let config = config.with_dataset(Some(fresh.display().to_string()));
        let mut session = Session::new();
        session.confirm("Pat", "Management", "Bengaluru").unwrap();
        let report = submit(&config, &mut session, &answers_with_planning(4)).unwrap();
        assert_eq!(report.dataset_size, 1);
        assert_eq!(report.submission.unwrap().key, "Pat_1");
        let contents = fs::read_to_string(&fresh).unwrap();
        assert!(!contents.contains("Zed"));
    }

    #[test]
    fn report_on_empty_dataset() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let store = ResponseStore::new(config.dataset_path(), config.fallback_dataset_path());
        let ds = store.load().unwrap();
        let report = build_report(&config, &ds, "Nobody", None).unwrap();
        assert_eq!(report.comparisons.by_team, ComparisonReport::NoData);
        assert_eq!(report.comparisons.by_place, ComparisonReport::NoData);
        assert_eq!(report.comparisons.by_team_place, TeamPlacesReport::NoData);
        assert_eq!(
            report.forecast,
            Ok(ForecastOutcome::NeedMoreHistory { missing: 3 })
        );
        let js = build_summary_js(&report);
        assert_eq!(js["comparisons"]["byTeam"]["status"], "noData");
        assert_eq!(js["comparisons"]["byTeamPlace"]["status"], "noData");
        assert_eq!(js["comparisons"]["byPlace"]["status"], "noData");
        assert_eq!(js["submission"], JSValue::Null);
    }

    #[test]
    fn failing_allocation_does_not_hide_other_sections() {
        let dir = tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.allocation = Some(LinearProgram {
            objective: vec![1.0],
            constraints: vec![vec![1.0], vec![-1.0]],
            limits: vec![1.0, -2.0],
            bounds: Vec::new(),
        });
        let mut session = Session::new();
        session.confirm("Carol", "IT Department", "Canberra").unwrap();
        let report = submit(&config, &mut session, &answers_with_planning(7)).unwrap();
        assert_eq!(report.allocation, Err(AnalyticsError::Infeasible));
        assert_eq!(report.comparisons.by_place.best(), Some("Canberra"));
        let js = build_summary_js(&report);
        assert_eq!(js["allocation"]["status"], "error");
    }

    #[test]
    fn reference_summary_check() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let ds = HistoricalDataset::new();
        let report = build_report(&config, &ds, "Dana", None).unwrap();

        let out = dir.path().join("summary.json").display().to_string();
        let written = OutputOptions {
            out: Some(out.clone()),
            reference: None,
        };
        write_summary(&report, &written).unwrap();

        let checked = OutputOptions {
            out: None,
            reference: Some(out.clone()),
        };
        write_summary(&report, &checked).unwrap();

        let other = build_report(&config, &ds, "Erin", None).unwrap();
        assert!(matches!(
            write_summary(&other, &checked),
            Err(SurveyError::ReferenceMismatch { .. })
        ));
    }

    #[test]
    fn interactive_session_submits_twice() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let mut session = Session::new();
        session.confirm("Frank", "Finance", "Canberra").unwrap();
        // Eight answers, submit again, eight default answers, stop.
        let script = "5\n5\n4\n4\n6\n6\n7\n7\ny\n\n\n\n\n\n\n\n\nn\n";
        let mut input = script.as_bytes();
        let mut out: Vec<u8> = Vec::new();
        let report = run_interactive(&config, &mut session, &mut input, &mut out).unwrap();
        assert_eq!(session.submissions().len(), 2);
        assert_eq!(session.submissions()[0].scores.governance, 7.0);
        let sub = report.submission.unwrap();
        assert_eq!(sub.key, "Frank_2");
        assert_eq!(sub.record.scores.planning, 4.0);
    }

    #[test]
    fn end_of_input_after_a_submission_stops_cleanly() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let mut session = Session::new();
        session.confirm("Gail", "Management", "Bengaluru").unwrap();
        let mut input = "5\n5\n4\n4\n6\n6\n7\n7\n".as_bytes();
        let mut out: Vec<u8> = Vec::new();
        let report = run_interactive(&config, &mut session, &mut input, &mut out).unwrap();
        assert_eq!(session.submissions().len(), 1);
        assert_eq!(report.submission.unwrap().key, "Gail_1");

        // Running out of answers in the middle of the questions is still an error.
        let mut input = "5\n5\n".as_bytes();
        assert!(matches!(
            run_interactive(&config, &mut session, &mut input, &mut out),
            Err(SurveyError::Prompt { .. })
        ));
    }
}
