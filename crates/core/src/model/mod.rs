mod ids;
mod question;
mod summary;
mod topic;

pub use ids::{ParseIdError, QuestionId};
pub use question::{
    CHOICE_COUNT, DIFFICULTY_RANGE, ImageRef, Question, QuestionDraft, QuestionError,
};
pub use summary::{PASSING_PERCENTAGE, ResultSummary, ScoreError};
pub use topic::{Topic, TopicError};
