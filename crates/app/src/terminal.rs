//! Line-oriented front end for the study runner and the tutor chat.
//!
//! Everything reads from a `BufRead` and writes to a `Write` so the loops can be
//! driven by scripted input in tests.

use std::error::Error;
use std::io::{BufRead, Write};

use edu_core::model::{Outcome, Session, SessionKind, SessionSummary};
use services::sessions::review_lines;
use services::tutor::{QUICK_PROMPTS, ToolAction};
use services::{RunnerPhase, ScoreBand, SessionRunner, TutorChat, TutorTool};

type TermResult<T> = Result<T, Box<dyn Error>>;

/// How a study loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Finished,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Pick(usize),
    Quit,
    Invalid,
}

fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or('?', |i| char::from(b'A' + i))
}

fn parse_choice(line: &str, option_count: usize) -> Choice {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    if let Ok(number) = trimmed.parse::<usize>() {
        return match number.checked_sub(1) {
            Some(index) if index < option_count => Choice::Pick(index),
            _ => Choice::Invalid,
        };
    }
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            let index = usize::from(c.to_ascii_uppercase() as u8 - b'A');
            if index < option_count {
                Choice::Pick(index)
            } else {
                Choice::Invalid
            }
        }
        _ => Choice::Invalid,
    }
}

fn read_line(input: &mut impl BufRead) -> TermResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn prompt(out: &mut impl Write, text: &str) -> TermResult<()> {
    write!(out, "{text}")?;
    out.flush()?;
    Ok(())
}

/// Run the started session to the end, offering "study again" after each pass.
///
/// # Errors
///
/// Returns I/O errors and runner contract violations.
pub fn study(
    runner: &mut SessionRunner,
    title: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> TermResult<Flow> {
    writeln!(out, "== {title} ==")?;
    loop {
        let flow = match runner.kind() {
            Some(SessionKind::Quiz) => run_quiz(runner, input, out)?,
            Some(SessionKind::Flashcard) => run_flashcards(runner, input, out)?,
            None => return Ok(Flow::Quit),
        };
        if flow == Flow::Quit {
            runner.abandon();
            writeln!(out, "Session closed.")?;
            return Ok(Flow::Quit);
        }

        let summary = runner.summarize()?;
        if let Some(session) = runner.session() {
            print_summary(&summary, session, out)?;
        }

        prompt(out, "Study again? [y/N] ")?;
        match read_line(input)? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                runner.restart()?;
            }
            _ => return Ok(Flow::Finished),
        }
    }
}

fn run_quiz(
    runner: &mut SessionRunner,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> TermResult<Flow> {
    while runner.phase() == RunnerPhase::InProgress {
        let (Some(progress), Some(question)) = (
            runner.progress(),
            runner.current_item().and_then(|item| item.as_question()),
        ) else {
            break;
        };
        let correct_so_far = runner
            .session()
            .map_or(0, |s| count(s, Outcome::Correct));

        writeln!(out)?;
        writeln!(
            out,
            "Question {} of {}    Score: {correct_so_far}",
            progress.answered + 1,
            progress.total
        )?;
        writeln!(out, "{}", question.prompt())?;
        for (index, option) in question.options().iter().enumerate() {
            writeln!(out, "  {}. {option}", option_label(index))?;
        }
        let option_count = question.options().len();
        let last = option_label(option_count - 1);
        prompt(out, &format!("Your answer (A-{last}, q to quit): "))?;

        let Some(line) = read_line(input)? else {
            return Ok(Flow::Quit);
        };
        match parse_choice(&line, option_count) {
            Choice::Pick(index) => {
                runner.answer(index)?;
            }
            Choice::Quit => return Ok(Flow::Quit),
            Choice::Invalid => writeln!(out, "Please pick one of the listed options.")?,
        }
    }
    Ok(Flow::Finished)
}

fn run_flashcards(
    runner: &mut SessionRunner,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> TermResult<Flow> {
    while runner.phase() == RunnerPhase::InProgress {
        let (Some(progress), Some(card), Some(session)) = (
            runner.progress(),
            runner.current_item().and_then(|item| item.as_card()),
            runner.session(),
        ) else {
            break;
        };

        writeln!(out)?;
        writeln!(
            out,
            "Card {} of {}    ✓ {}  ⟳ {}",
            progress.answered + 1,
            progress.total,
            count(session, Outcome::Known),
            count(session, Outcome::Unknown)
        )?;
        if session.is_revealed() {
            writeln!(out, "{}", card.back())?;
            prompt(
                out,
                "Did you know it? (k = knew it, u = needs review, f = flip back, q = quit): ",
            )?;
        } else {
            writeln!(out, "{}", card.front())?;
            prompt(out, "Press enter to flip (q to quit): ")?;
        }
        let revealed = session.is_revealed();

        let Some(line) = read_line(input)? else {
            return Ok(Flow::Quit);
        };
        let command = line.trim().to_ascii_lowercase();
        match (revealed, command.as_str()) {
            (_, "q") => return Ok(Flow::Quit),
            (false, _) => runner.reveal()?,
            (true, "k") => {
                runner.assess(true)?;
            }
            (true, "u") => {
                runner.assess(false)?;
            }
            (true, "f") => runner.hide()?,
            (true, _) => writeln!(out, "Type k, u, f or q.")?,
        }
    }
    Ok(Flow::Finished)
}

fn count(session: &Session, outcome: Outcome) -> usize {
    session
        .outcomes()
        .iter()
        .filter(|r| r.outcome == outcome)
        .count()
}

fn print_summary(
    summary: &SessionSummary,
    session: &Session,
    out: &mut impl Write,
) -> TermResult<()> {
    writeln!(out)?;
    match summary.kind() {
        SessionKind::Quiz => {
            let band = ScoreBand::from_percent(summary.score_percent());
            writeln!(out, "Quiz complete! {}", band.headline())?;
            writeln!(
                out,
                "You scored {} out of {} ({}%)",
                summary.correct(),
                summary.total(),
                summary.rounded_percent()
            )?;
            writeln!(out, "Review your answers:")?;
            for line in review_lines(session) {
                if line.is_correct() {
                    writeln!(out, "  Question {}: ✓ Correct", line.number)?;
                } else {
                    writeln!(out, "  Question {}: ✗ Wrong", line.number)?;
                    if let Some(correct) = &line.correct_answer {
                        writeln!(out, "    Correct answer: {correct}")?;
                    }
                    if let Some(explanation) = &line.explanation {
                        writeln!(out, "    {explanation}")?;
                    }
                }
            }
        }
        SessionKind::Flashcard => {
            writeln!(out, "Study session complete!")?;
            writeln!(out, "  ✓ Mastered: {} cards", summary.known())?;
            writeln!(out, "  ⟳ Need review: {} cards", summary.unknown())?;
        }
    }
    Ok(())
}

/// Send a single question and print the reply with its follow-ups.
///
/// # Errors
///
/// Returns I/O errors from `out`.
pub async fn ask_once(
    chat: &mut TutorChat,
    question: &str,
    out: &mut impl Write,
) -> TermResult<()> {
    if let Some(reply) = chat.send(question).await {
        writeln!(out, "{}", reply.content)?;
    }
    print_follow_ups(chat, out)
}

fn print_follow_ups(chat: &TutorChat, out: &mut impl Write) -> TermResult<()> {
    if !chat.follow_ups().is_empty() {
        writeln!(out, "Follow-up ideas:")?;
        for follow_up in chat.follow_ups() {
            writeln!(out, "  - {follow_up}")?;
        }
    }
    Ok(())
}

/// Interactive tutor session.
///
/// Commands: `/quit`, `/prompts`, `/prompt <n>`, `/tools`, `/tool <name>`, `/subject <name>`.
///
/// # Errors
///
/// Returns I/O errors.
pub async fn run_tutor(
    chat: &mut TutorChat,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> TermResult<()> {
    if let Some(welcome) = chat.messages().first() {
        writeln!(out, "{}", welcome.content)?;
    }

    loop {
        prompt(out, &format!("\n[{}] > ", chat.subject()))?;
        let Some(line) = read_line(input)? else {
            return Ok(());
        };
        let line = line.trim();

        let message = match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => return Ok(()),
            ("/prompts", _) => {
                for (index, quick) in QUICK_PROMPTS.iter().enumerate() {
                    writeln!(out, "  {}. {quick}", index + 1)?;
                }
                continue;
            }
            ("/prompt", n) => match n.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                Some(index) if index < QUICK_PROMPTS.len() => QUICK_PROMPTS[index].to_string(),
                _ => {
                    writeln!(out, "Pick a prompt between 1 and {}.", QUICK_PROMPTS.len())?;
                    continue;
                }
            },
            ("/tools", _) => {
                let names: Vec<_> = TutorTool::ALL.iter().map(|t| t.name()).collect();
                writeln!(out, "  {}", names.join(", "))?;
                continue;
            }
            ("/tool", name) => match name.parse::<TutorTool>() {
                Ok(tool) => match tool.action() {
                    ToolAction::ComingSoon(notice) => {
                        writeln!(out, "{notice}")?;
                        continue;
                    }
                    ToolAction::Prefill(text) => {
                        prompt(out, text)?;
                        let rest = read_line(input)?.unwrap_or_default();
                        format!("{text}{rest}")
                    }
                },
                Err(err) => {
                    writeln!(out, "{err}")?;
                    continue;
                }
            },
            ("/subject", subject) => {
                if subject.trim().is_empty() {
                    writeln!(out, "Usage: /subject <name>")?;
                } else {
                    chat.set_subject(subject.trim());
                }
                continue;
            }
            _ => line.to_string(),
        };

        if let Some(reply) = chat.send(&message).await {
            writeln!(out, "{}", reply.content)?;
        }
        print_follow_ups(chat, out)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use edu_core::model::{CardFaces, Item, ItemId, Question, TutorSettings};
    use edu_core::time::fixed_clock;
    use services::MockAnsweringService;

    fn quiz_runner() -> SessionRunner {
        let mut runner = SessionRunner::new(fixed_clock());
        runner
            .start(vec![
                Item::question(
                    ItemId::new(1),
                    Question::new("Prime?", vec!["9".into(), "17".into()], 1).unwrap(),
                ),
                Item::question(
                    ItemId::new(2),
                    Question::new("sin 30°?", vec!["1/2".into(), "1".into()], 0).unwrap(),
                ),
            ])
            .unwrap();
        runner
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn parses_letters_and_numbers() {
        assert_eq!(parse_choice("b", 4), Choice::Pick(1));
        assert_eq!(parse_choice(" 3 ", 4), Choice::Pick(2));
        assert_eq!(parse_choice("Q", 4), Choice::Quit);
        assert_eq!(parse_choice("e", 4), Choice::Invalid);
        assert_eq!(parse_choice("0", 4), Choice::Invalid);
        assert_eq!(parse_choice("", 4), Choice::Invalid);
    }

    #[test]
    fn quiz_reports_score_and_correct_answers() {
        let mut runner = quiz_runner();
        let mut input = Cursor::new("z\nB\nb\nn\n");
        let mut out = Vec::new();

        let flow = study(&mut runner, "Math", &mut input, &mut out).unwrap();
        let text = output(out);

        assert_eq!(flow, Flow::Finished);
        assert!(text.contains("Please pick one of the listed options."));
        assert!(text.contains("You scored 1 out of 2 (50%)"));
        assert!(text.contains("Question 2: ✗ Wrong"));
        assert!(text.contains("Correct answer: 1/2"));
        assert_eq!(runner.phase(), RunnerPhase::Complete);
    }

    #[test]
    fn quitting_abandons_the_session() {
        let mut runner = quiz_runner();
        let mut input = Cursor::new("q\n");
        let mut out = Vec::new();

        let flow = study(&mut runner, "Math", &mut input, &mut out).unwrap();
        assert_eq!(flow, Flow::Quit);
        assert_eq!(runner.phase(), RunnerPhase::NotStarted);
    }

    #[test]
    fn flashcards_flip_then_assess_and_study_again() {
        let mut runner = SessionRunner::new(fixed_clock());
        runner
            .start(vec![
                Item::card(ItemId::new(1), CardFaces::new("Mole", "6.022 × 10²³").unwrap()),
                Item::card(ItemId::new(2), CardFaces::new("pH of an acid", "< 7").unwrap()),
            ])
            .unwrap();
        // flip, knew it; flip, flip back, flip, needs review; study again; quit.
        let mut input = Cursor::new("\nk\n\nf\n\nu\ny\nq\n");
        let mut out = Vec::new();

        let flow = study(&mut runner, "Chemistry", &mut input, &mut out).unwrap();
        let text = output(out);

        assert_eq!(flow, Flow::Quit);
        assert!(text.contains("6.022 × 10²³"));
        assert!(text.contains("✓ Mastered: 1 cards"));
        assert!(text.contains("⟳ Need review: 1 cards"));
    }

    #[tokio::test]
    async fn tutor_handles_commands_and_questions() {
        let mut chat = TutorChat::new(
            Arc::new(MockAnsweringService),
            fixed_clock(),
            &TutorSettings::default(),
        );
        let mut input = Cursor::new("/tool voice\n/subject physics\n/prompt 1\n/quit\n");
        let mut out = Vec::new();

        run_tutor(&mut chat, &mut input, &mut out).await.unwrap();
        let text = output(out);

        assert!(text.contains("Voice input feature coming soon!"));
        assert!(
            text.contains("about physics: \"Explain the Pythagorean theorem with an example\"")
        );
        assert!(text.contains("Follow-up ideas:"));
        assert_eq!(chat.messages().len(), 3);
    }

    #[tokio::test]
    async fn subject_without_name_prints_usage() {
        let mut chat = TutorChat::new(
            Arc::new(MockAnsweringService),
            fixed_clock(),
            &TutorSettings::default(),
        );
        let mut input = Cursor::new("/subject\n/subject   \n/quit\n");
        let mut out = Vec::new();

        run_tutor(&mut chat, &mut input, &mut out).await.unwrap();
        let text = output(out);

        assert_eq!(text.matches("Usage: /subject <name>").count(), 2);
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.subject(), "general");
    }

    #[tokio::test]
    async fn tutor_tool_prefills_the_question() {
        let mut chat = TutorChat::new(
            Arc::new(MockAnsweringService),
            fixed_clock(),
            &TutorSettings::default(),
        );
        let mut input = Cursor::new("/tool summarize\nphotosynthesis\n/quit\n");
        let mut out = Vec::new();

        run_tutor(&mut chat, &mut input, &mut out).await.unwrap();
        assert_eq!(
            chat.messages()[1].content,
            "Summarize the material on photosynthesis"
        );
    }
}
