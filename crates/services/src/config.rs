use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use quiz_core::model::{DIFFICULTY_RANGE, Topic};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of questions in a quiz when nothing else is requested.
pub const DEFAULT_QUESTION_COUNT: usize = 20;

/// What a quiz should be built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizConfig {
    /// `None` means all topics.
    pub topic: Option<Topic>,
    pub question_count: usize,
    pub min_difficulty: u8,
    pub max_difficulty: u8,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            topic: None,
            question_count: DEFAULT_QUESTION_COUNT,
            min_difficulty: *DIFFICULTY_RANGE.start(),
            max_difficulty: *DIFFICULTY_RANGE.end(),
        }
    }
}

impl QuizConfig {
    /// Read a config from a JSON file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Parse` if it is not a valid config document.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidQuestionCount` for a zero count and
    /// `ConfigError::InvalidDifficultyRange` for an empty or out-of-range
    /// difficulty window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.question_count == 0 {
            return Err(ConfigError::InvalidQuestionCount);
        }
        if self.min_difficulty > self.max_difficulty
            || !DIFFICULTY_RANGE.contains(&self.min_difficulty)
            || !DIFFICULTY_RANGE.contains(&self.max_difficulty)
        {
            return Err(ConfigError::InvalidDifficultyRange {
                min: self.min_difficulty,
                max: self.max_difficulty,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn difficulty_range(&self) -> RangeInclusive<u8> {
        self.min_difficulty..=self.max_difficulty
    }

    /// True when the config admits every question in the corpus.
    #[must_use]
    pub fn covers_all_difficulties(&self) -> bool {
        self.difficulty_range() == DIFFICULTY_RANGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_full_practice_test() {
        let config = QuizConfig::default();
        assert_eq!(config.question_count, 20);
        assert_eq!(config.topic, None);
        assert!(config.covers_all_difficulties());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: QuizConfig =
            serde_json::from_str(r#"{ "topic": "PARKING", "maxDifficulty": 3 }"#).unwrap();
        assert_eq!(config.topic, Some(Topic::Parking));
        assert_eq!(config.question_count, 20);
        assert_eq!(config.difficulty_range(), 1..=3);
    }

    #[test]
    fn rejects_zero_questions() {
        let config = QuizConfig {
            question_count: 0,
            ..QuizConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQuestionCount)
        ));
    }

    #[test]
    fn rejects_bad_difficulty_windows() {
        for (min, max) in [(4, 2), (0, 3), (2, 6)] {
            let config = QuizConfig {
                min_difficulty: min,
                max_difficulty: max,
                ..QuizConfig::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::InvalidDifficultyRange { .. })
                ),
                "{min}..={max}"
            );
        }
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.json");
        fs::write(&path, r#"{ "questionCount": 5 }"#).unwrap();

        let config = QuizConfig::from_json_file(&path).unwrap();
        assert_eq!(config.question_count, 5);

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            QuizConfig::from_json_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
