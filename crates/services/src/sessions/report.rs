use chrono::{DateTime, Duration, Utc};

use quiz_core::model::{QuestionId, ResultSummary, Topic};

use super::service::QuizSession;
use crate::error::SessionError;

/// Correct and answered counts for one topic within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicAccuracy {
    pub topic: Topic,
    pub correct: usize,
    pub answered: usize,
}

impl TopicAccuracy {
    /// Truncated percentage; 0 when nothing was answered.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        ResultSummary::summarize(self.correct, self.answered)
            .map(|summary| summary.percentage())
            .unwrap_or(0)
    }
}

/// A question answered incorrectly, for review after the quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedQuestion {
    pub question_id: QuestionId,
    pub topic: Topic,
    pub text: String,
    pub selected: usize,
    pub selected_answer: String,
    pub correct_index: usize,
    pub correct_answer: String,
    pub explanation: String,
    pub reference: String,
}

/// Everything shown on the results screen of a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub summary: ResultSummary,
    /// One entry per topic, in the order topics first appeared.
    pub topics: Vec<TopicAccuracy>,
    pub missed: Vec<MissedQuestion>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionReport {
    /// Build a report from the answers recorded so far.
    ///
    /// Works on unfinished sessions too, scoring only answered questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Score` if the recorded counts are inconsistent.
    pub fn from_session(session: &QuizSession) -> Result<Self, SessionError> {
        let (correct, answered) = session.score_so_far();
        let summary = ResultSummary::summarize(correct, answered)?;

        let mut topics: Vec<TopicAccuracy> = Vec::new();
        let mut missed = Vec::new();
        for (question, answer) in session.answered() {
            let index = match topics.iter().position(|t| t.topic == question.topic()) {
                Some(index) => index,
                None => {
                    topics.push(TopicAccuracy {
                        topic: question.topic(),
                        correct: 0,
                        answered: 0,
                    });
                    topics.len() - 1
                }
            };
            let entry = &mut topics[index];
            entry.answered += 1;

            if answer.correct {
                entry.correct += 1;
            } else {
                missed.push(MissedQuestion {
                    question_id: question.id().clone(),
                    topic: question.topic(),
                    text: question.text().to_owned(),
                    selected: answer.selected,
                    selected_answer: question.choices()[answer.selected].clone(),
                    correct_index: question.correct_index(),
                    correct_answer: question.correct_answer().to_owned(),
                    explanation: question.explanation().to_owned(),
                    reference: question.reference().to_owned(),
                });
            }
        }

        Ok(Self {
            summary,
            topics,
            missed,
            started_at: session.started_at(),
            completed_at: session.completed_at(),
        })
    }

    /// Time from start to completion; `None` while in progress.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.completed_at.map(|done| done - self.started_at)
    }
}
