// Text rendering of the questionnaire and of the reports.

use std::fmt::Write as _;

use survey_analytics::aggregate::GroupScores;
use survey_analytics::scoring::{questions, LIKERT_LABELS};

use crate::survey::*;

const POINT_WIDTH: usize = 4;

pub fn render_questions() -> String {
    let mut s = String::new();
    let _ = writeln!(s, "Answer scale:");
    for l in LIKERT_LABELS {
        let _ = writeln!(s, "  {}", l);
    }
    let mut idx = 1;
    for c in Category::ALL {
        let _ = writeln!(s, "\n{}", c.label());
        for q in questions(c) {
            let _ = writeln!(s, "  {}. {}", idx, q);
            idx += 1;
        }
    }
    s
}

fn scale_position(x: f64) -> usize {
    let top = Likert::MAX as f64;
    (x.max(0.0).min(top) * POINT_WIDTH as f64).round() as usize
}

/// One bar per category, with the benchmark drawn as `|`.
pub fn render_chart(scores: &CategoryScores, benchmark: f64) -> String {
    let width = Likert::MAX as usize * POINT_WIDTH;
    let marker = scale_position(benchmark);
    let mut s = String::new();
    for (c, x) in scores.iter() {
        let filled = scale_position(x);
        let bar: String = (0..=width)
            .map(|i| {
                if i == marker {
                    '|'
                } else if i < filled {
                    '#'
                } else {
                    ' '
                }
            })
            .collect();
        let _ = writeln!(s, "{:>10} {} {:.2}", c.label(), bar, x);
    }
    let _ = writeln!(s, "{:>10} benchmark: {:.2}", "", benchmark);
    s
}

pub fn render_forecast(
    category: Category,
    forecast: &Result<ForecastOutcome, AnalyticsError>,
) -> String {
    match forecast {
        Ok(ForecastOutcome::Predicted { value, history }) => format!(
            "Forecast of the next {} score: {:.2} (from {} submissions)\n",
            category.label(),
            value,
            history
        ),
        Ok(ForecastOutcome::NeedMoreHistory { missing }) => format!(
            "Not enough history to forecast {}: {} more submission(s) needed\n",
            category.label(),
            missing
        ),
        Err(e) => format!("Forecast of {} unavailable: {}\n", category.label(), e),
    }
}

pub fn render_allocation(allocation: &Result<Allocation, AnalyticsError>) -> String {
    match allocation {
        Ok(a) => {
            let mut s = String::from("Resource allocation:\n");
            for (i, x) in a.values.iter().enumerate() {
                let _ = writeln!(s, "  x{} = {:.4}", i + 1, x);
            }
            let _ = writeln!(s, "  objective = {:.4}", a.objective);
            s
        }
        Err(e) => format!("Resource allocation unavailable: {}\n", e),
    }
}

fn render_groups(s: &mut String, groups: &[GroupScores], best: &str) {
    let _ = write!(s, "  {:<16}{:>6}", "", "n");
    for c in Category::ALL {
        let _ = write!(s, "{:>12}", c.label());
    }
    let _ = writeln!(s, "{:>10}", "Overall");
    for g in groups {
        let _ = write!(s, "  {:<16}{:>6}", g.label, g.count);
        for (_, x) in g.means.iter() {
            let _ = write!(s, "{:>12.2}", x);
        }
        let _ = writeln!(s, "{:>10.2}", g.overall());
    }
    let _ = writeln!(s, "  Best: {}", best);
}

fn render_comparison(s: &mut String, title: &str, report: &ComparisonReport) {
    let _ = writeln!(s, "{}", title);
    match report {
        ComparisonReport::NoData => {
            let _ = writeln!(s, "  No data to compare yet");
        }
        ComparisonReport::Ranked(c) => render_groups(s, &c.groups, &c.best),
    }
}

pub fn render_comparisons(summary: &ComparisonSummary) -> String {
    let mut s = String::new();
    render_comparison(&mut s, "Teams:", &summary.by_team);
    let _ = writeln!(s, "Places within each team:");
    match &summary.by_team_place {
        TeamPlacesReport::NoData => {
            let _ = writeln!(s, "  No data to compare yet");
        }
        TeamPlacesReport::PerTeam(teams) => {
            for tp in teams {
                let _ = writeln!(s, " {}", tp.team.label());
                render_groups(&mut s, &tp.places.groups, &tp.places.best);
            }
        }
    }
    render_comparison(&mut s, "Places:", &summary.by_place);
    s
}

pub fn render_report(report: &Report) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "==== Survey report for {} ====", report.respondent);
    match &report.submission {
        Some(sub) => {
            let r = &sub.record;
            let _ = writeln!(
                s,
                "Recorded as {} ({}, {})",
                sub.key,
                r.team.label(),
                r.place.label()
            );
            if sub.used_fallback {
                let _ = writeln!(
                    s,
                    "The usual dataset location could not be written: saved to {} instead",
                    sub.location.display()
                );
            } else {
                let _ = writeln!(s, "Saved to {}", sub.location.display());
            }
            s.push('\n');
            s.push_str(&render_chart(&r.scores, report.benchmark));
        }
        None => {
            let _ = writeln!(s, "No new submission");
        }
    }
    let _ = writeln!(s, "\n{} record(s) in the dataset", report.dataset_size);
    s.push_str(&render_forecast(report.forecast_category, &report.forecast));
    s.push('\n');
    s.push_str(&render_allocation(&report.allocation));
    s.push('\n');
    s.push_str(&render_comparisons(&report.comparisons));
    s
}
