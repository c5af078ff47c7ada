use chrono::{DateTime, Utc};
use log::debug;
use std::fmt;

use quiz_core::Clock;
use quiz_core::model::{CHOICE_COUNT, Question, QuestionId};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Outcome of answering one question, shown to the user before advancing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub selected: usize,
    pub correct: bool,
    pub correct_index: usize,
    pub explanation: String,
}

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz over a fixed, ordered sequence of questions.
///
/// Each question must be answered before the session moves past it, and a
/// question is scored at most once. Questions are never revisited.
pub struct QuizSession {
    questions: Vec<Question>,
    answers: Vec<Option<AnswerFeedback>>,
    current: usize,
    answered_count: usize,
    correct_count: usize,
    clock: Clock,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over `questions`. An empty sequence starts completed.
    #[must_use]
    pub fn new(questions: Vec<Question>, clock: Clock) -> Self {
        let started_at = clock.now();
        let completed_at = questions.is_empty().then_some(started_at);
        debug!("quiz session started with {} questions", questions.len());

        Self {
            answers: vec![None; questions.len()],
            questions,
            current: 0,
            answered_count: 0,
            correct_count: 0,
            clock,
            started_at,
            completed_at,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.current >= self.questions.len() {
            SessionState::Completed
        } else {
            SessionState::InProgress
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Completed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Zero-based index of the current question.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// # Errors
    ///
    /// Returns `SessionError::OutOfSession` once the session is complete.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.questions
            .get(self.current)
            .ok_or(SessionError::OutOfSession)
    }

    /// Feedback for the current question, if it has been answered.
    #[must_use]
    pub fn current_answer(&self) -> Option<&AnswerFeedback> {
        self.answers.get(self.current).and_then(Option::as_ref)
    }

    /// Answer the current question.
    ///
    /// Answering the same question again returns the first feedback without
    /// changing the score.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfSession` if the session is complete and
    /// `SessionError::InvalidChoice` if `selected` is not a choice index.
    pub fn submit_answer(&mut self, selected: usize) -> Result<&AnswerFeedback, SessionError> {
        let question = self
            .questions
            .get(self.current)
            .ok_or(SessionError::OutOfSession)?;
        if selected >= CHOICE_COUNT {
            return Err(SessionError::InvalidChoice(selected));
        }

        let slot = &mut self.answers[self.current];
        if slot.is_none() {
            let correct = question.is_correct(selected);
            self.answered_count += 1;
            if correct {
                self.correct_count += 1;
            }
            *slot = Some(AnswerFeedback {
                question_id: question.id().clone(),
                selected,
                correct,
                correct_index: question.correct_index(),
                explanation: question.explanation().to_owned(),
            });
        }

        slot.as_ref().ok_or(SessionError::NotAnswered)
    }

    /// Move past the answered current question, using the session clock.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::advance_at`].
    pub fn advance(&mut self) -> Result<SessionState, SessionError> {
        let now = self.clock.now();
        self.advance_at(now)
    }

    /// Move past the answered current question. Moving past the last
    /// question completes the session at `now`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfSession` if the session is complete and
    /// `SessionError::NotAnswered` if the current question has no answer yet.
    pub fn advance_at(&mut self, now: DateTime<Utc>) -> Result<SessionState, SessionError> {
        if self.is_complete() {
            return Err(SessionError::OutOfSession);
        }
        if self.current_answer().is_none() {
            return Err(SessionError::NotAnswered);
        }

        self.current += 1;
        if self.is_complete() {
            self.completed_at = Some(now);
            debug!(
                "quiz session completed: {}/{} correct",
                self.correct_count, self.answered_count
            );
        }
        Ok(self.state())
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        SessionProgress {
            position: if self.is_complete() {
                total
            } else {
                self.current + 1
            },
            total,
            answered: self.answered_count,
            correct: self.correct_count,
            is_complete: self.is_complete(),
        }
    }

    /// `(correct, answered)` so far.
    #[must_use]
    pub fn score_so_far(&self) -> (usize, usize) {
        (self.correct_count, self.answered_count)
    }

    /// Answered questions with their feedback, in session order.
    pub fn answered(&self) -> impl Iterator<Item = (&Question, &AnswerFeedback)> {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter_map(|(question, answer)| answer.as_ref().map(|a| (question, a)))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered_count", &self.answered_count)
            .field("correct_count", &self.correct_count)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}
