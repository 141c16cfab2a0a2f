// Importing the workbooks written by earlier versions of the survey.
//
// The first row holds the column names. The first column (the row keys) is
// ignored: keys are assigned again when the records are appended.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::survey::io_common::simplify_file_name;
use crate::survey::*;

const NAME: &str = "Name";
const TEAM: &str = "Team";
const PLACE: &str = "Place";

pub fn read_workbook(
    path: &Path,
    worksheet_name: Option<&str>,
) -> SurveyResult<Vec<RespondentRecord>> {
    let path_s = path.display().to_string();
    debug!(
        "read_workbook: path: {:?} worksheet: {:?}",
        simplify_file_name(path),
        worksheet_name
    );
    let mut workbook: Xlsx<_> =
        open_workbook(path).context(OpeningExcelSnafu { path: &path_s })?;
    let range = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?
            .context(OpeningExcelSnafu { path: &path_s })?,
        // Defaults to the first worksheet.
        None => match workbook.worksheets().into_iter().next() {
            Some((name, r)) => {
                debug!("read_workbook: using worksheet {:?}", name);
                r
            }
            None => return EmptyExcelSnafu {}.fail(),
        },
    };
    let records = parse_rows(range.rows())?;
    info!(
        "read_workbook: {} records in {}",
        records.len(),
        simplify_file_name(path)
    );
    Ok(records)
}

fn find_column(header: &[DataType], name: &str) -> SurveyResult<usize> {
    header
        .iter()
        .position(|c| match c {
            DataType::String(s) => s.trim() == name,
            _ => false,
        })
        .context(MissingColumnSnafu { name })
}

fn cell_text(row: &[DataType], idx: usize, lineno: u64) -> SurveyResult<String> {
    match row.get(idx) {
        Some(DataType::String(s)) => Ok(s.trim().to_string()),
        x => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

fn cell_score(row: &[DataType], idx: usize, lineno: u64) -> SurveyResult<f64> {
    let res = match row.get(idx) {
        Some(DataType::Float(f)) => Some(*f),
        Some(DataType::Int(i)) => Some(*i as f64),
        Some(DataType::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match res {
        Some(x) if x.is_finite() => Ok(x),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", row.get(idx)),
        }
        .fail(),
    }
}

fn parse_rows<'a, I>(rows: I) -> SurveyResult<Vec<RespondentRecord>>
where
    I: IntoIterator<Item = &'a [DataType]>,
{
    let mut it = rows.into_iter();
    let header = it.next().context(EmptyExcelSnafu {})?;
    let name_idx = find_column(header, NAME)?;
    let team_idx = find_column(header, TEAM)?;
    let place_idx = find_column(header, PLACE)?;
    let mut score_idxs: Vec<(Category, usize)> = Vec::new();
    for c in Category::ALL {
        score_idxs.push((c, find_column(header, c.label())?));
    }

    let mut res = Vec::new();
    for (idx, row) in it.enumerate() {
        let lineno = (idx + 2) as u64;
        if row.iter().all(|c| *c == DataType::Empty) {
            debug!("parse_rows: skipping empty line {}", lineno);
            continue;
        }
        let name = cell_text(row, name_idx, lineno)?;
        let team_s = cell_text(row, team_idx, lineno)?;
        let team = Team::from_label(&team_s).context(UnknownTeamSnafu {
            value: &team_s,
            lineno,
        })?;
        let place_s = cell_text(row, place_idx, lineno)?;
        let place = Place::from_label(&place_s).context(UnknownPlaceSnafu {
            value: &place_s,
            lineno,
        })?;
        let mut scores = CategoryScores::default();
        for (c, col) in score_idxs.iter() {
            scores.set(*c, cell_score(row, *col, lineno)?);
        }
        res.push(RespondentRecord {
            name,
            team,
            place,
            scores,
        });
    }
    Ok(res)
}
