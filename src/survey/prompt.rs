// Asking the questions on a terminal.

use survey_analytics::scoring::{questions, split_answers, DEFAULT_ANSWER, LIKERT_LABELS};

use crate::survey::*;

fn read_line<R: BufRead>(input: &mut R) -> SurveyResult<String> {
    let mut line = String::new();
    let n = input.read_line(&mut line).context(PromptSnafu {})?;
    if n == 0 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof)).context(PromptSnafu {});
    }
    Ok(line.trim().to_string())
}

/// Asks one question until a valid answer is given. An empty answer keeps the default.
fn ask_one<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> SurveyResult<Likert> {
    loop {
        write!(out, "{}\n[{}] > ", question, DEFAULT_ANSWER.value()).context(PromptSnafu {})?;
        out.flush().context(PromptSnafu {})?;
        let line = read_line(input)?;
        if line.is_empty() {
            return Ok(DEFAULT_ANSWER);
        }
        match Likert::parse(&line) {
            Ok(x) => return Ok(x),
            Err(e) => {
                debug!("ask_one: rejected {:?}: {}", line, e);
                writeln!(out, "Please answer with a number between 1 and 7.").context(PromptSnafu {})?;
            }
        }
    }
}

/// Asks all the questions, category by category.
pub fn ask_answers<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> SurveyResult<Vec<(Category, Vec<Likert>)>> {
    writeln!(out, "Scale:").context(PromptSnafu {})?;
    for l in LIKERT_LABELS {
        writeln!(out, "  {}", l).context(PromptSnafu {})?;
    }
    let mut res = Vec::new();
    for c in Category::ALL {
        writeln!(out, "\n== {} ==", c.label()).context(PromptSnafu {})?;
        let mut answers = Vec::new();
        for q in questions(c) {
            answers.push(ask_one(input, out, q)?);
        }
        res.push((c, answers));
    }
    Ok(res)
}

pub fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> SurveyResult<bool> {
    loop {
        write!(out, "{} [y/n] > ", question).context(PromptSnafu {})?;
        out.flush().context(PromptSnafu {})?;
        match read_line(input)?.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => {}
        }
    }
}

/// Parses the answers given on the command line, in questionnaire order.
pub fn parse_answers(values: &[String]) -> SurveyResult<Vec<(Category, Vec<Likert>)>> {
    let mut answers = Vec::new();
    for v in values {
        answers.push(Likert::parse(v).context(InvalidAnswerSnafu { value: v })?);
    }
    split_answers(&answers).context(AnalyticsSnafu {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_retries() {
        // One invalid answer, then seven answers with two defaults.
        let mut input = "9\n2\n\n3\n4\n5\n6\n\n7\n".as_bytes();
        let mut out: Vec<u8> = Vec::new();
        let res = ask_answers(&mut input, &mut out).unwrap();
        let values: Vec<u8> = res
            .iter()
            .flat_map(|(_, xs)| xs.iter().map(|x| x.value()))
            .collect();
        assert_eq!(values, vec![2, 4, 3, 4, 5, 6, 4, 7]);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("== Governance =="));
        assert!(text.contains("Please answer with a number between 1 and 7."));
    }

    #[test]
    fn end_of_input_stops_the_prompt() {
        let mut input = "5\n".as_bytes();
        let mut out: Vec<u8> = Vec::new();
        assert!(matches!(
            ask_answers(&mut input, &mut out),
            Err(SurveyError::Prompt { .. })
        ));
    }

    #[test]
    fn yes_no() {
        let mut input = "maybe\nYES\n".as_bytes();
        let mut out: Vec<u8> = Vec::new();
        assert!(ask_yes_no(&mut input, &mut out, "Again?").unwrap());
        let mut input = "n\n".as_bytes();
        assert!(!ask_yes_no(&mut input, &mut out, "Again?").unwrap());
    }

    #[test]
    fn command_line_answers() {
        let ok: Vec<String> = "5,5,4,4,6,6,7,7".split(',').map(|s| s.to_string()).collect();
        let parsed = parse_answers(&ok).unwrap();
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[2].0, Category::Resources);

        let bad: Vec<String> = vec!["5".to_string(), "x".to_string()];
        assert!(matches!(
            parse_answers(&bad),
            Err(SurveyError::InvalidAnswer { .. })
        ));
        let short: Vec<String> = vec!["5".to_string(); 3];
        assert!(matches!(
            parse_answers(&short),
            Err(SurveyError::Analytics { .. })
        ));
    }
}
