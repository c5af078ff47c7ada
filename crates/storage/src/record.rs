//! Record format for question sources.
//!
//! A source document is either a bare JSON array of records or a pack object
//! whose `questions` field holds that array. Records are decoded one at a
//! time so a single bad record never poisons the rest of its source.

use log::debug;
use once_cell::sync::Lazy;
use quiz_core::model::{ImageRef, Question, QuestionDraft, QuestionError, Topic, TopicError};
use serde::Deserialize;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::source::SourceError;

static QUESTION_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^TX-([A-Z]{3})-(\d{4})$").expect("QUESTION_ID is a valid regex pattern")
});

/// Why a single record was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error(transparent)]
    Topic(#[from] TopicError),

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error("question id {id} does not match TX-{expected}-NNNN")]
    IdMismatch { id: String, expected: &'static str },

    #[error("duplicate question id {0}")]
    DuplicateId(String),
}

/// Persisted shape of a question. Every field is optional here so that
/// absence can be reported precisely instead of as a generic decode error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<i64>,
    pub text: Option<String>,
    pub choices: Option<Vec<String>>,
    pub correct_index: Option<i64>,
    pub explanation: Option<String>,
    pub reference: Option<String>,
    pub image: Option<ImageRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub asset_id: Option<String>,
}

impl QuestionRecord {
    /// Decode a record from an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Malformed` if a field has the wrong JSON type.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        serde_json::from_value(value).map_err(|e| RecordError::Malformed(e.to_string()))
    }

    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if a required field is missing, the topic is not
    /// one of the fixed tags, or the question fails validation.
    pub fn into_question(self) -> Result<Question, RecordError> {
        let id = self.id.ok_or(RecordError::MissingField("id"))?;
        let topic: Topic = self
            .topic
            .ok_or(RecordError::MissingField("topic"))?
            .parse()?;
        check_id(&id, topic)?;
        let difficulty = self
            .difficulty
            .ok_or(RecordError::MissingField("difficulty"))?;
        let text = self.text.ok_or(RecordError::MissingField("text"))?;
        let choices = self.choices.ok_or(RecordError::MissingField("choices"))?;
        let correct_index = self
            .correct_index
            .ok_or(RecordError::MissingField("correctIndex"))?;
        let explanation = self
            .explanation
            .ok_or(RecordError::MissingField("explanation"))?;
        let reference = self
            .reference
            .ok_or(RecordError::MissingField("reference"))?;
        let image = self.image.map(|image| ImageRef {
            kind: image.kind.unwrap_or_default(),
            asset_id: image.asset_id.unwrap_or_default(),
        });

        let question = QuestionDraft {
            id,
            topic,
            difficulty,
            text,
            choices,
            correct_index,
            explanation,
            reference,
            image,
        }
        .validate()?;

        Ok(question)
    }
}

/// Ids are `TX-<topic code>-<4 digits>`, and the code must match the topic.
fn check_id(id: &str, topic: Topic) -> Result<(), RecordError> {
    let matches = QUESTION_ID
        .captures(id.trim())
        .and_then(|captures| captures.get(1))
        .is_some_and(|code| code.as_str() == topic.code());
    if matches {
        Ok(())
    } else {
        Err(RecordError::IdMismatch {
            id: id.to_owned(),
            expected: topic.code(),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceDocument {
    Records(Vec<Value>),
    Pack(PackDocument),
}

/// Versioned pack of questions. Only `questions` is required; the metadata
/// is informational and accepted in any JSON shape.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackDocument {
    #[serde(default)]
    state_code: Value,
    #[serde(default)]
    version: Value,
    questions: Vec<Value>,
}

/// Split a source document into its raw records.
///
/// # Errors
///
/// Returns `SourceError::Malformed` if the bytes are not a record array or pack.
pub fn parse_document(name: &str, bytes: &[u8]) -> Result<Vec<Value>, SourceError> {
    let document: SourceDocument =
        serde_json::from_slice(bytes).map_err(|source| SourceError::Malformed {
            name: name.to_owned(),
            source,
        })?;

    Ok(match document {
        SourceDocument::Records(records) => records,
        SourceDocument::Pack(pack) => {
            debug!(
                "{name}: pack {} version {}",
                pack.state_code, pack.version
            );
            pack.questions
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> Value {
        json!({
            "id": "TX-ROW-0001",
            "topic": "RIGHT_OF_WAY",
            "difficulty": 2,
            "text": "Who goes first at a four-way stop?",
            "choices": ["The largest vehicle", "The first to stop", "The driver on the left", "Whoever honks"],
            "correctIndex": 1,
            "explanation": "The first vehicle to come to a complete stop proceeds first.",
            "reference": "Texas Driver Handbook, ch. 4",
            "image": { "type": "scene", "assetId": "four_way_stop" }
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut record = valid_record();
        record[field] = value;
        record
    }

    fn without(field: &str) -> Value {
        let mut record = valid_record();
        record.as_object_mut().unwrap().remove(field);
        record
    }

    fn convert(value: Value) -> Result<Question, RecordError> {
        QuestionRecord::from_value(value)?.into_question()
    }

    #[test]
    fn converts_valid_record() {
        let question = convert(valid_record()).unwrap();
        assert_eq!(question.topic(), Topic::RightOfWay);
        assert_eq!(question.difficulty(), 2);
        assert_eq!(question.image().unwrap().asset_id, "four_way_stop");
    }

    #[test]
    fn reports_missing_fields_by_name() {
        assert_eq!(
            convert(without("correctIndex")).unwrap_err(),
            RecordError::MissingField("correctIndex")
        );
        assert_eq!(
            convert(without("reference")).unwrap_err(),
            RecordError::MissingField("reference")
        );
    }

    #[test]
    fn rejects_three_choices() {
        let err = convert(with("choices", json!(["a", "b", "c"]))).unwrap_err();
        assert_eq!(err, RecordError::Question(QuestionError::ChoiceCount(3)));
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = convert(with("correctIndex", json!(7))).unwrap_err();
        assert_eq!(
            err,
            RecordError::Question(QuestionError::CorrectIndexOutOfRange(7))
        );
    }

    #[test]
    fn rejects_unknown_topic() {
        let err = convert(with("topic", json!("BOATING"))).unwrap_err();
        assert!(matches!(err, RecordError::Topic(_)));
    }

    #[test]
    fn rejects_id_from_another_topic() {
        let err = convert(with("id", json!("TX-PRK-0001"))).unwrap_err();
        assert_eq!(
            err,
            RecordError::IdMismatch {
                id: "TX-PRK-0001".into(),
                expected: "ROW",
            }
        );
    }

    #[test]
    fn rejects_malformed_ids() {
        for id in ["ROW-0001", "TX-ROW-1", "TX-row-0001", "TX-ROW-00012", "CA-ROW-0001"] {
            assert!(
                matches!(
                    convert(with("id", json!(id))),
                    Err(RecordError::IdMismatch { .. })
                ),
                "{id}"
            );
        }
    }

    #[test]
    fn rejects_wrongly_typed_field() {
        let err = convert(with("difficulty", json!("hard"))).unwrap_err();
        assert!(matches!(err, RecordError::Malformed(_)));
    }

    #[test]
    fn rejects_image_without_asset_id() {
        let err = convert(with("image", json!({ "type": "svg" }))).unwrap_err();
        assert_eq!(err, RecordError::Question(QuestionError::IncompleteImage));
    }

    #[test]
    fn parses_bare_array_and_pack_documents() {
        let array = serde_json::to_vec(&json!([valid_record(), valid_record()])).unwrap();
        assert_eq!(parse_document("array", &array).unwrap().len(), 2);

        let pack = serde_json::to_vec(&json!({
            "stateCode": "TX",
            "version": 3,
            "totalQuestions": 1,
            "topics": { "RIGHT_OF_WAY": 1 },
            "generatedDate": "2025-01-01",
            "questions": [valid_record()]
        }))
        .unwrap();
        assert_eq!(parse_document("pack", &pack).unwrap().len(), 1);
    }

    #[test]
    fn pack_metadata_shape_is_not_enforced() {
        let records =
            parse_document("p", br#"{"stateCode":"TX","version":"2.1","questions":[]}"#).unwrap();
        assert!(records.is_empty());

        let records = parse_document("p", br#"{"stateCode":null,"questions":[{}]}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn rejects_non_document_bytes() {
        let err = parse_document("broken", b"{ not json").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));

        let err = parse_document("object", br#"{"hello": 1}"#).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }
}
