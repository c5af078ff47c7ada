use std::ops::RangeInclusive;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::topic::Topic;

/// Every question offers exactly this many choices.
pub const CHOICE_COUNT: usize = 4;

/// Allowed difficulty levels.
pub const DIFFICULTY_RANGE: RangeInclusive<u8> = 1..=5;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("expected 4 choices, got {0}")]
    ChoiceCount(usize),

    #[error("correct index {0} is outside 0..4")]
    CorrectIndexOutOfRange(i64),

    #[error("difficulty {0} is outside 1..=5")]
    DifficultyOutOfRange(i64),

    #[error("image reference requires both a type and an asset id")]
    IncompleteImage,
}

//
// ─── IMAGE ─────────────────────────────────────────────────────────────────────
//

/// Reference to an illustration shown alongside a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub kind: String,
    pub asset_id: String,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question fields, as read from a source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: String,
    pub topic: Topic,
    pub difficulty: i64,
    pub text: String,
    pub choices: Vec<String>,
    pub correct_index: i64,
    pub explanation: String,
    pub reference: String,
    pub image: Option<ImageRef>,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id or text is blank, there are not exactly
    /// four choices, the correct index or difficulty is out of range, or the
    /// image reference is incomplete.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = QuestionId::new(self.id).map_err(|_| QuestionError::EmptyId)?;

        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let choices: [String; CHOICE_COUNT] = self
            .choices
            .try_into()
            .map_err(|rejected: Vec<String>| QuestionError::ChoiceCount(rejected.len()))?;

        let correct_index = usize::try_from(self.correct_index)
            .ok()
            .filter(|index| *index < CHOICE_COUNT)
            .ok_or(QuestionError::CorrectIndexOutOfRange(self.correct_index))?;

        let difficulty = u8::try_from(self.difficulty)
            .ok()
            .filter(|level| DIFFICULTY_RANGE.contains(level))
            .ok_or(QuestionError::DifficultyOutOfRange(self.difficulty))?;

        if let Some(image) = &self.image {
            if image.kind.trim().is_empty() || image.asset_id.trim().is_empty() {
                return Err(QuestionError::IncompleteImage);
            }
        }

        Ok(Question {
            id,
            topic: self.topic,
            difficulty,
            text: self.text,
            choices,
            correct_index,
            explanation: self.explanation,
            reference: self.reference,
            image: self.image,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    topic: Topic,
    difficulty: u8,
    text: String,
    choices: [String; CHOICE_COUNT],
    correct_index: usize,
    explanation: String,
    reference: String,
    image: Option<ImageRef>,
}

impl Question {
    /// Returns the question id, e.g. `TX-SIG-0001`.
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Returns the topic the question belongs to.
    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Returns the difficulty level, within `DIFFICULTY_RANGE`.
    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Returns the question prompt.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the four answer choices in display order.
    #[must_use]
    pub fn choices(&self) -> &[String; CHOICE_COUNT] {
        &self.choices
    }

    /// Returns the index of the correct choice.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Returns the explanation shown after answering.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Returns the handbook reference backing the answer.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the illustration reference, if any.
    #[must_use]
    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    /// Returns true when the question carries an illustration.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Returns the text of the correct choice.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.choices[self.correct_index]
    }

    /// Returns true when `selected` is the correct choice index.
    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
