use crate::survey::*;

/// The details entered on the first form.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RespondentDetails {
    pub name: String,
    pub team: Team,
    pub place: Place,
}

/// The state of one run of the program: who is answering, and what they have
/// submitted so far.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Session {
    respondent: Option<RespondentDetails>,
    submissions: Vec<RespondentRecord>,
}

fn labels<'a>(xs: impl Iterator<Item = &'a str>) -> String {
    xs.map(|x| format!("{:?}", x)).collect::<Vec<String>>().join(", ")
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    /// Validates the details form. Confirming again replaces the respondent.
    pub fn confirm(&mut self, name: &str, team: &str, place: &str) -> SurveyResult<&RespondentDetails> {
        let team = Team::from_label(team).context(UnknownDetailSnafu {
            field: "team",
            value: team,
            expected: labels(Team::FORM_ORDER.iter().map(|t| t.label())),
        })?;
        let place = Place::from_label(place).context(UnknownDetailSnafu {
            field: "place",
            value: place,
            expected: labels(Place::FORM_ORDER.iter().map(|p| p.label())),
        })?;
        // The builder owns the name rules.
        Builder::new(name, team, place).context(AnalyticsSnafu {})?;
        let details = RespondentDetails {
            name: name.trim().to_string(),
            team,
            place,
        };
        debug!("confirm: {:?}", details);
        Ok(self.respondent.insert(details))
    }

    pub fn respondent(&self) -> Option<&RespondentDetails> {
        self.respondent.as_ref()
    }

    /// A fresh builder for the confirmed respondent.
    pub fn builder(&self) -> SurveyResult<Builder> {
        match &self.respondent {
            Some(d) => Builder::new(&d.name, d.team, d.place).context(AnalyticsSnafu {}),
            None => whatever!("the respondent details have not been confirmed"),
        }
    }

    pub fn record_submission(&mut self, record: RespondentRecord) {
        self.submissions.push(record);
    }

    pub fn submissions(&self) -> &[RespondentRecord] {
        &self.submissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_validates_the_form() {
        let mut s = Session::new();
        match s.confirm("Alice", "Sales", "Canberra") {
            Err(e @ SurveyError::UnknownDetail { .. }) => assert_eq!(
                e.to_string(),
                "Unknown team \"Sales\", expected one of: \"IT Department\", \"Management\", \"Finance\""
            ),
            x => panic!("unexpected result {:?}", x),
        }
        match s.confirm("Alice", "Finance", "Sydney") {
            Err(e) => assert!(!e.to_string().contains("line")),
            x => panic!("unexpected result {:?}", x),
        }
        assert!(matches!(
            s.confirm("   ", "Finance", "Canberra"),
            Err(SurveyError::Analytics {
                source: AnalyticsError::EmptyName
            })
        ));
        assert!(s.respondent().is_none());

        let d = s.confirm(" Alice ", "it department", "Canberra").unwrap();
        assert_eq!(d.name, "Alice");
        assert_eq!(d.team, Team::ItDepartment);
    }

    #[test]
    fn builder_needs_a_respondent() {
        let mut s = Session::new();
        assert!(s.builder().is_err());
        s.confirm("Bob", "Management", "Bengaluru").unwrap();
        assert!(!s.builder().unwrap().is_complete());
    }
}
