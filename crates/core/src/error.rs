use thiserror::Error;

use crate::model::{QuestionError, ScoreError, TopicError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error(transparent)]
    Score(#[from] ScoreError),
}
