use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::*;

/// The labels of the 7-point scale, indexed by value - 1.
pub const LIKERT_LABELS: [&str; 7] = [
    "1: Not at all",
    "2: To a very little extent",
    "3: To a little extent",
    "4: To a moderate extent",
    "5: To a fairly large extent",
    "6: To a great extent",
    "7: To a very great extent",
];

/// The answer preselected on the form.
pub const DEFAULT_ANSWER: Likert = Likert(4);

/// An answer on the 1-7 Likert scale.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Likert(u8);

impl Likert {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(value: i64) -> Result<Likert, AnalyticsError> {
        if (Likert::MIN as i64..=Likert::MAX as i64).contains(&value) {
            Ok(Likert(value as u8))
        } else {
            Err(AnalyticsError::AnswerOutOfRange(value))
        }
    }

    /// Parses either a bare number (`"5"`) or a scale label (`"5: To a fairly large extent"`).
    pub fn parse(s: &str) -> Result<Likert, AnalyticsError> {
        let head = s.split(':').next().unwrap_or("").trim();
        match head.parse::<i64>() {
            Ok(x) => Likert::new(x),
            Err(_) => Err(AnalyticsError::UnreadableAnswer(s.trim().to_string())),
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> &'static str {
        LIKERT_LABELS[(self.0 - 1) as usize]
    }
}

/// The survey questions, grouped by category.
pub fn questions(category: Category) -> &'static [&'static str] {
    match category {
        Category::Planning => &[
            "How effectively does your organisation assess its resource needs to align with strategic goals and high-performance outcomes?",
            "How agile is the organisation's planning process in addressing new challenges and seizing opportunities in a rapidly evolving business environment?",
        ],
        Category::Capital => &[
            "How proactively does your organisation monitor and respond to technological, market, and competitive changes in its industry?",
            "In what ways does your organisation adapt to shifting customer demands, regulatory changes, and stakeholder expectations?",
        ],
        Category::Resources => &[
            "How well does your organisation align financial, technological, and human resources to meet high-performance objectives?",
            "How effectively does the organisation leverage its resources to foster innovation and achieve operational excellence?",
        ],
        Category::Governance => &[
            "How robust and transparent are the governance structures in ensuring accountability and ethical compliance?",
            "To what extent do governance practices align operational decisions with the organisation's strategic vision?",
        ],
    }
}

/// The total number of questions on the form.
pub fn question_count() -> usize {
    Category::ALL.iter().map(|c| questions(*c).len()).sum()
}

/// The arithmetic mean of the answers given for one category.
///
/// The result is always within the scale since every answer is.
pub fn category_average(category: Category, answers: &[Likert]) -> Result<f64, AnalyticsError> {
    if answers.is_empty() {
        return Err(AnalyticsError::EmptyCategory(category));
    }
    let total: u32 = answers.iter().map(|a| a.value() as u32).sum();
    let avg = total as f64 / answers.len() as f64;
    debug!(
        "category_average: {}: {:?} -> {}",
        category.label(),
        answers,
        avg
    );
    Ok(avg)
}

/// Splits a flat list of answers, in questionnaire order, into the answers of each category.
pub fn split_answers(answers: &[Likert]) -> Result<Vec<(Category, Vec<Likert>)>, AnalyticsError> {
    let expected = question_count();
    if answers.len() != expected {
        return Err(AnalyticsError::DimensionMismatch(format!(
            "expected {} answers, got {}",
            expected,
            answers.len()
        )));
    }
    let mut res = Vec::new();
    let mut rest = answers;
    for c in Category::ALL {
        let (head, tail) = rest.split_at(questions(c).len());
        res.push((c, head.to_vec()));
        rest = tail;
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(xs: &[i64]) -> Vec<Likert> {
        xs.iter().map(|x| Likert::new(*x).unwrap()).collect()
    }

    #[test]
    fn average_of_two_answers() {
        let avg = category_average(Category::Planning, &answers(&[4, 6])).unwrap();
        assert_eq!(avg, 5.0);
    }

    #[test]
    fn average_stays_on_scale() {
        for xs in [vec![1], vec![7, 7, 7], vec![1, 7], vec![2, 3, 5, 7]] {
            let avg = category_average(Category::Capital, &answers(&xs)).unwrap();
            assert!((1.0..=7.0).contains(&avg));
            let expected = xs.iter().sum::<i64>() as f64 / xs.len() as f64;
            assert!((avg - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_category_is_an_error() {
        assert_eq!(
            category_average(Category::Resources, &[]),
            Err(AnalyticsError::EmptyCategory(Category::Resources))
        );
    }

    #[test]
    fn likert_bounds() {
        assert!(Likert::new(0).is_err());
        assert!(Likert::new(8).is_err());
        assert_eq!(Likert::new(7).unwrap().label(), "7: To a very great extent");
    }

    #[test]
    fn likert_parses_labels() {
        assert_eq!(Likert::parse("5: To a fairly large extent"), Likert::new(5));
        assert_eq!(Likert::parse(" 3 "), Likert::new(3));
        assert_eq!(
            Likert::parse("often"),
            Err(AnalyticsError::UnreadableAnswer("often".to_string()))
        );
        assert_eq!(
            Likert::parse("often").unwrap_err().to_string(),
            "answer \"often\" is not a number between 1 and 7"
        );
        assert_eq!(Likert::parse("9"), Err(AnalyticsError::AnswerOutOfRange(9)));
        assert_eq!(DEFAULT_ANSWER.label(), "4: To a moderate extent");
    }

    #[test]
    fn split_follows_questionnaire_order() {
        let flat = answers(&[1, 2, 3, 4, 5, 6, 7, 7]);
        let split = split_answers(&flat).unwrap();
        assert_eq!(split[0], (Category::Planning, answers(&[1, 2])));
        assert_eq!(split[3], (Category::Governance, answers(&[7, 7])));
        assert!(split_answers(&flat[..3]).is_err());
    }
}
