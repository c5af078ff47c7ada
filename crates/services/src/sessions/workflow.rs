use std::sync::Arc;

use log::debug;
use rand::Rng;

use storage::repository::QuestionRepository;

use super::report::SessionReport;
use super::service::QuizSession;
use crate::Clock;
use crate::config::QuizConfig;
use crate::error::SessionError;
use crate::sampler::SessionSampler;

/// Orchestrates quiz start and finish over a loaded corpus.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository + Send + Sync>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionRepository + Send + Sync>) -> Self {
        Self { clock, questions }
    }

    #[must_use]
    pub fn questions(&self) -> &dyn QuestionRepository {
        self.questions.as_ref()
    }

    /// Start a quiz with freshly seeded randomness.
    ///
    /// # Errors
    ///
    /// See [`QuizService::start_session_with`].
    pub fn start_session(&self, config: &QuizConfig) -> Result<QuizSession, SessionError> {
        self.start_session_with(config, &mut SessionSampler::new())
    }

    /// Start a quiz, drawing questions through `sampler`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` for an invalid config and
    /// `SessionError::Empty` when no question matches it.
    pub fn start_session_with<R: Rng>(
        &self,
        config: &QuizConfig,
        sampler: &mut SessionSampler<R>,
    ) -> Result<QuizSession, SessionError> {
        config.validate()?;

        let questions = sampler.sample_config(self.questions.as_ref(), config);
        if questions.is_empty() {
            debug!("no questions match {config:?}");
            return Err(SessionError::Empty);
        }
        Ok(QuizSession::new(questions, self.clock))
    }

    /// Final report of a completed quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` while the session is in progress.
    pub fn finish(&self, session: &QuizSession) -> Result<SessionReport, SessionError> {
        if !session.is_complete() {
            return Err(SessionError::NotComplete);
        }
        SessionReport::from_session(session)
    }
}
