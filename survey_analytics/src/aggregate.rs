use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::config::*;

/// The mean scores of a group of records.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct GroupScores {
    pub label: String,
    pub count: usize,
    pub means: CategoryScores,
}

impl GroupScores {
    /// The mean of the per-category means.
    pub fn overall(&self) -> f64 {
        self.means.overall()
    }
}

/// The groups of one comparison, in natural order, and the best one.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Comparison {
    pub groups: Vec<GroupScores>,
    pub best: String,
}

/// A comparison, unless there was nothing to compare.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ComparisonReport {
    NoData,
    Ranked(Comparison),
}

impl ComparisonReport {
    pub fn best(&self) -> Option<&str> {
        match self {
            ComparisonReport::NoData => None,
            ComparisonReport::Ranked(c) => Some(c.best.as_str()),
        }
    }
}

/// The comparison of places inside one team.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct TeamPlaces {
    pub team: Team,
    pub places: Comparison,
}

/// The place comparisons of every team, unless there was nothing to compare.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "status", content = "teams", rename_all = "camelCase")]
pub enum TeamPlacesReport {
    NoData,
    /// One entry per team present in the data, in natural order.
    PerTeam(Vec<TeamPlaces>),
}

impl TeamPlacesReport {
    pub fn teams(&self) -> &[TeamPlaces] {
        match self {
            TeamPlacesReport::NoData => &[],
            TeamPlacesReport::PerTeam(xs) => xs,
        }
    }

    /// The best place inside the given team.
    pub fn best_for(&self, team: Team) -> Option<&str> {
        self.teams()
            .iter()
            .find(|tp| tp.team == team)
            .map(|tp| tp.places.best.as_str())
    }
}

/// All the group comparisons over a dataset.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub by_team: ComparisonReport,
    pub by_team_place: TeamPlacesReport,
    pub by_place: ComparisonReport,
}

fn group_by<'a, K, F>(
    records: &[&'a RespondentRecord],
    key: F,
) -> BTreeMap<K, Vec<&'a RespondentRecord>>
where
    K: Ord,
    F: Fn(&RespondentRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a RespondentRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(key(*r)).or_default().push(*r);
    }
    groups
}

fn mean_scores(label: &str, records: &[&RespondentRecord]) -> GroupScores {
    let mut means = CategoryScores::default();
    for c in Category::ALL {
        let total: f64 = records.iter().map(|r| r.scores.get(c)).sum();
        means.set(c, total / records.len() as f64);
    }
    GroupScores {
        label: label.to_string(),
        count: records.len(),
        means,
    }
}

// The groups are scanned in natural order and only a strictly greater score
// replaces the current best: ties go to the first group.
fn rank(groups: Vec<GroupScores>) -> Option<Comparison> {
    let mut best: Option<&GroupScores> = None;
    for g in groups.iter() {
        match best {
            Some(b) if g.overall() <= b.overall() => {}
            _ => best = Some(g),
        }
    }
    let best = best?.label.clone();
    debug!("rank: best group {:?} among {:?}", best, groups);
    Some(Comparison { groups, best })
}

fn compare_by<K, F, L>(records: &[&RespondentRecord], key: F, label: L) -> Option<Comparison>
where
    K: Ord + Copy,
    F: Fn(&RespondentRecord) -> K,
    L: Fn(K) -> &'static str,
{
    let groups = group_by(records, key)
        .iter()
        .map(|(k, rs)| mean_scores(label(*k), rs))
        .collect();
    rank(groups)
}

/// Compares the mean scores by team, by place inside each team, and by place.
pub fn compare(dataset: &HistoricalDataset) -> ComparisonSummary {
    let records: Vec<&RespondentRecord> = dataset.records().collect();

    let by_team = compare_by(&records, |r| r.team, |t: Team| t.label());
    let by_place = compare_by(&records, |r| r.place, |p: Place| p.label());

    let per_team: Vec<TeamPlaces> = group_by(&records, |r| r.team)
        .into_iter()
        .filter_map(|(team, rs)| {
            compare_by(&rs, |r| r.place, |p: Place| p.label())
                .map(|places| TeamPlaces { team, places })
        })
        .collect();
    let by_team_place = if per_team.is_empty() {
        TeamPlacesReport::NoData
    } else {
        TeamPlacesReport::PerTeam(per_team)
    };

    ComparisonSummary {
        by_team: by_team.map_or(ComparisonReport::NoData, ComparisonReport::Ranked),
        by_team_place,
        by_place: by_place.map_or(ComparisonReport::NoData, ComparisonReport::Ranked),
    }
}
