use edu_core::model::{Outcome, Session};

/// Coarse grade of a finished score, used to pick the tone of the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    KeepPracticing,
}

impl ScoreBand {
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            Self::Excellent
        } else if percent >= 60.0 {
            Self::Good
        } else {
            Self::KeepPracticing
        }
    }

    #[must_use]
    pub fn headline(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent work!",
            Self::Good => "Nice job!",
            Self::KeepPracticing => "Keep practicing!",
        }
    }
}

/// Presentation-agnostic line of the "review your answers" list.
///
/// `correct_answer` is only filled in when the recorded answer was wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLine {
    pub number: usize,
    pub prompt: String,
    pub outcome: Option<Outcome>,
    pub chosen_answer: Option<String>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

impl ReviewLine {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.outcome.is_some_and(Outcome::is_positive)
    }
}

/// Reconcile recorded answers with the items of a session.
#[must_use]
pub fn review_lines(session: &Session) -> Vec<ReviewLine> {
    session
        .review()
        .into_iter()
        .map(|entry| {
            let outcome = entry.outcome();
            let wrong = outcome.is_some_and(|o| !o.is_positive());
            let (prompt, explanation) = match (entry.item.as_question(), entry.item.as_card()) {
                (Some(question), _) => (
                    question.prompt().to_owned(),
                    question.explanation().map(str::to_owned),
                ),
                (None, Some(card)) => (card.front().to_owned(), None),
                (None, None) => (String::new(), None),
            };
            ReviewLine {
                number: entry.index + 1,
                prompt,
                outcome,
                chosen_answer: entry.chosen_option().map(str::to_owned),
                correct_answer: entry
                    .correct_option()
                    .filter(|_| wrong)
                    .map(str::to_owned),
                explanation,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_core::model::{CardFaces, Item, ItemId, Question};
    use edu_core::time::fixed_now;

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ScoreBand::from_percent(100.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_percent(80.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_percent(79.9), ScoreBand::Good);
        assert_eq!(ScoreBand::from_percent(60.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_percent(40.0), ScoreBand::KeepPracticing);
    }

    #[test]
    fn wrong_answers_show_the_correct_option() {
        let question = |id, correct| {
            Item::question(
                ItemId::new(id),
                Question::new(format!("Q{id}"), vec!["a".into(), "b".into()], correct)
                    .unwrap()
                    .with_explanation("because"),
            )
        };
        let mut session =
            Session::start(vec![question(1, 0), question(2, 0)], fixed_now()).unwrap();
        session.record_choice(0, fixed_now()).unwrap();
        session.record_choice(1, fixed_now()).unwrap();

        let lines = review_lines(&session);
        assert!(lines[0].is_correct());
        assert_eq!(lines[0].correct_answer, None);
        assert!(!lines[1].is_correct());
        assert_eq!(lines[1].number, 2);
        assert_eq!(lines[1].chosen_answer.as_deref(), Some("b"));
        assert_eq!(lines[1].correct_answer.as_deref(), Some("a"));
        assert_eq!(lines[1].explanation.as_deref(), Some("because"));
    }

    #[test]
    fn unanswered_cards_have_no_outcome() {
        let card = Item::card(ItemId::new(1), CardFaces::new("Mole", "6.022e23").unwrap());
        let session = Session::start(vec![card], fixed_now()).unwrap();
        let lines = review_lines(&session);
        assert_eq!(lines[0].prompt, "Mole");
        assert_eq!(lines[0].outcome, None);
        assert!(!lines[0].is_correct());
    }
}
