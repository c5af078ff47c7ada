#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod sampler;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use config::{DEFAULT_QUESTION_COUNT, QuizConfig};
pub use error::{ConfigError, SessionError};
pub use sampler::SessionSampler;
pub use sessions::{
    AnswerFeedback, MissedQuestion, QuizService, QuizSession, SessionProgress, SessionReport,
    SessionState, TopicAccuracy,
};
