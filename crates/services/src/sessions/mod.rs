mod progress;
mod report;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use report::{MissedQuestion, SessionReport, TopicAccuracy};
pub use service::{AnswerFeedback, QuizSession, SessionState};
pub use workflow::QuizService;
