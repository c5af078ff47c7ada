//! Line-oriented quiz front end over any reader and writer.

use std::io::{self, BufRead, Write};

use quiz_core::model::{CHOICE_COUNT, Question};
use services::{QuizConfig, QuizSession, SessionError, SessionReport};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConsoleError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// How an interactive quiz ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    Quit,
}

const LETTERS: [char; CHOICE_COUNT] = ['a', 'b', 'c', 'd'];

/// Map `a`-`d` or `1`-`4` (any case, surrounding spaces allowed) to a choice index.
#[must_use]
pub fn parse_choice(input: &str) -> Option<usize> {
    let input = input.trim().to_ascii_lowercase();
    let mut chars = input.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    match c {
        'a'..='d' => LETTERS.iter().position(|l| *l == c),
        '1'..='4' => c.to_digit(10).and_then(|d| usize::try_from(d - 1).ok()),
        _ => None,
    }
}

/// One-line description of what a quiz will draw from.
#[must_use]
pub fn describe_config(config: &QuizConfig) -> String {
    let topic = config
        .topic
        .map_or_else(|| "All topics".to_owned(), |topic| topic.display_name());
    let difficulty = if config.covers_all_difficulties() {
        String::new()
    } else {
        format!(
            ", difficulty {}-{}",
            config.min_difficulty, config.max_difficulty
        )
    };
    format!("{topic}, {} questions{difficulty}", config.question_count)
}

fn is_quit(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "q" | "quit")
}

/// Drive `session` to completion, reading one answer per line from `input`.
///
/// End of input or `q` stops early with `Outcome::Quit`.
///
/// # Errors
///
/// Returns `ConsoleError` if reading or writing fails.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut QuizSession,
    mut input: R,
    out: &mut W,
) -> Result<Outcome, ConsoleError> {
    let mut line = String::new();

    while !session.is_complete() {
        let progress = session.progress();
        let question = session.current_question()?;
        writeln!(out)?;
        writeln!(
            out,
            "Question {}/{} [{}] ({} left)",
            progress.position,
            progress.total,
            question.topic().display_name(),
            progress.remaining()
        )?;
        write_question(question, out)?;

        let selected = loop {
            write!(out, "> ")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 || is_quit(&line) {
                return Ok(Outcome::Quit);
            }
            match parse_choice(&line) {
                Some(choice) => break choice,
                None => writeln!(out, "Enter a-d or 1-4 (q to quit).")?,
            }
        };

        let feedback = session.submit_answer(selected)?;
        if feedback.correct {
            writeln!(out, "Correct!")?;
        } else {
            writeln!(
                out,
                "Incorrect. The answer is {}.",
                LETTERS[feedback.correct_index]
            )?;
        }
        writeln!(out, "{}", feedback.explanation)?;
        session.advance()?;
    }

    Ok(Outcome::Finished)
}

fn write_question<W: Write>(question: &Question, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", question.text())?;
    if let Some(image) = question.image() {
        writeln!(out, "  (image: {} {})", image.kind, image.asset_id)?;
    }
    for (letter, choice) in LETTERS.iter().zip(question.choices()) {
        writeln!(out, "  {letter}) {choice}")?;
    }
    Ok(())
}

/// Print the results screen.
///
/// # Errors
///
/// Returns the first write error.
pub fn write_report<W: Write>(report: &SessionReport, out: &mut W) -> io::Result<()> {
    let summary = &report.summary;
    writeln!(out)?;
    writeln!(
        out,
        "Score: {}/{} ({}%) {}",
        summary.correct(),
        summary.total(),
        summary.percentage(),
        if summary.passed() { "PASS" } else { "FAIL" }
    )?;
    if let Some(duration) = report.duration() {
        writeln!(
            out,
            "Time: {}m {:02}s",
            duration.num_minutes(),
            duration.num_seconds() % 60
        )?;
    }

    if !report.topics.is_empty() {
        writeln!(out)?;
        writeln!(out, "By topic:")?;
        for topic in &report.topics {
            writeln!(
                out,
                "  {:<20} {}/{} ({}%)",
                topic.topic.display_name(),
                topic.correct,
                topic.answered,
                topic.percentage()
            )?;
        }
    }

    if !report.missed.is_empty() {
        writeln!(out)?;
        writeln!(out, "Review:")?;
        for missed in &report.missed {
            writeln!(out, "  [{}] {}", missed.question_id, missed.text)?;
            writeln!(out, "    your answer: {}", missed.selected_answer)?;
            writeln!(out, "    correct:     {}", missed.correct_answer)?;
            writeln!(out, "    {} ({})", missed.explanation, missed.reference)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionDraft, Topic};
    use quiz_core::time::fixed_clock;
    use std::io::Cursor;

    fn question(n: usize, correct_index: i64) -> Question {
        QuestionDraft {
            id: format!("TX-SIG-{n:04}"),
            topic: Topic::Signs,
            difficulty: 1,
            text: format!("Sign question {n}"),
            choices: vec!["Stop".into(), "Yield".into(), "Merge".into(), "Detour".into()],
            correct_index,
            explanation: "Read the sign.".into(),
            reference: "Texas Driver Handbook, ch. 5".into(),
            image: None,
        }
        .validate()
        .unwrap()
    }

    fn session() -> QuizSession {
        QuizSession::new(vec![question(1, 0), question(2, 3)], fixed_clock())
    }

    #[test]
    fn parses_letters_and_numbers() {
        assert_eq!(parse_choice("a"), Some(0));
        assert_eq!(parse_choice(" D \n"), Some(3));
        assert_eq!(parse_choice("2"), Some(1));
        assert_eq!(parse_choice("4"), Some(3));
        assert_eq!(parse_choice("e"), None);
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice("ab"), None);
        assert_eq!(parse_choice(""), None);
    }

    #[test]
    fn answers_every_question_and_reprompts_on_bad_input() {
        let mut session = session();
        let mut out = Vec::new();

        let outcome = run_session(&mut session, Cursor::new("x\na\n2\n"), &mut out).unwrap();
        assert_eq!(outcome, Outcome::Finished);
        assert_eq!(session.score_so_far(), (1, 2));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Question 1/2 [Signs] (2 left)"));
        assert!(text.contains("Question 2/2 [Signs] (1 left)"));
        assert!(text.contains("Enter a-d or 1-4"));
        assert!(text.contains("Correct!"));
        assert!(text.contains("Incorrect. The answer is d."));
    }

    #[test]
    fn describes_only_restricted_difficulty() {
        assert_eq!(
            describe_config(&QuizConfig::default()),
            "All topics, 20 questions"
        );

        let config = QuizConfig {
            topic: Some(Topic::RightOfWay),
            question_count: 5,
            min_difficulty: 2,
            max_difficulty: 4,
        };
        assert_eq!(
            describe_config(&config),
            "Right Of Way, 5 questions, difficulty 2-4"
        );
    }

    #[test]
    fn end_of_input_quits_with_partial_score() {
        let mut session = session();
        let mut out = Vec::new();

        let outcome = run_session(&mut session, Cursor::new("a\n"), &mut out).unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert!(!session.is_complete());
        assert_eq!(session.score_so_far(), (1, 1));
    }

    #[test]
    fn report_lists_missed_questions() {
        let mut session = session();
        run_session(&mut session, Cursor::new("b\nd\n"), &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        write_report(&SessionReport::from_session(&session).unwrap(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Score: 1/2 (50%) FAIL"));
        assert!(text.contains("[TX-SIG-0001] Sign question 1"));
        assert!(text.contains("your answer: Yield"));
        assert!(!text.contains("TX-SIG-0002"));
    }
}
