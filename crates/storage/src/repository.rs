use std::collections::HashSet;

use log::{info, warn};
use quiz_core::model::{Question, QuestionId, Topic};
use thiserror::Error;

use crate::record::{QuestionRecord, RecordError, parse_document};
use crate::source::{BoxedSource, SourceError};

/// Errors surfaced by corpus loading.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CorpusError {
    #[error("no questions could be loaded ({} source(s) failed)", .report.failures.len())]
    Empty { report: LoadReport },
}

/// Number of questions accepted from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLoad {
    pub source: String,
    pub loaded: usize,
}

/// A source that could not be read or decoded and was skipped.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub error: SourceError,
}

/// A record that was skipped; `position` is its index within the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub source: String,
    pub position: usize,
    pub reason: RecordError,
}

/// Everything that happened while loading a corpus.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub sources: Vec<SourceLoad>,
    pub failures: Vec<SourceFailure>,
    pub rejected: Vec<RejectedRecord>,
}

impl LoadReport {
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.sources.iter().map(|s| s.loaded).sum()
    }

    /// True when every source was read and every record accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.rejected.is_empty()
    }
}

/// Read-only queries over a loaded question corpus.
pub trait QuestionRepository {
    /// All questions in corpus order. Returns an owned copy.
    fn all(&self) -> Vec<Question>;

    /// Questions tagged with `topic`, in corpus order. Empty if none.
    fn by_topic(&self, topic: Topic) -> Vec<Question>;

    fn count(&self) -> usize;

    fn count_by_topic(&self, topic: Topic) -> usize;
}

/// Immutable in-memory corpus, built once from a set of sources.
#[derive(Debug, Clone)]
pub struct InMemoryQuestionRepository {
    questions: Vec<Question>,
}

impl InMemoryQuestionRepository {
    /// Load every source into a single corpus.
    ///
    /// A source that cannot be read or decoded is logged and skipped, as is
    /// any individual record that fails validation or repeats an earlier id.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Empty` if no question could be loaded at all.
    pub fn load(sources: &[BoxedSource]) -> Result<(Self, LoadReport), CorpusError> {
        let mut builder = CorpusBuilder::default();
        let mut report = LoadReport::default();

        for source in sources {
            let name = source.name().to_owned();
            let records = match source
                .read()
                .and_then(|bytes| parse_document(&name, &bytes))
            {
                Ok(records) => records,
                Err(error) => {
                    warn!("skipping source {name}: {error}");
                    report.failures.push(SourceFailure {
                        source: name,
                        error,
                    });
                    continue;
                }
            };

            let mut loaded = 0;
            for (position, value) in records.into_iter().enumerate() {
                let accepted = QuestionRecord::from_value(value)
                    .and_then(QuestionRecord::into_question)
                    .and_then(|question| builder.push(question));
                match accepted {
                    Ok(()) => loaded += 1,
                    Err(reason) => {
                        warn!("skipping record {position} of {name}: {reason}");
                        report.rejected.push(RejectedRecord {
                            source: name.clone(),
                            position,
                            reason,
                        });
                    }
                }
            }
            report.sources.push(SourceLoad {
                source: name,
                loaded,
            });
        }

        if builder.questions.is_empty() {
            return Err(CorpusError::Empty { report });
        }

        info!(
            "loaded {} questions from {} source(s); {} failed, {} records rejected",
            builder.questions.len(),
            report.sources.len(),
            report.failures.len(),
            report.rejected.len()
        );

        Ok((
            Self {
                questions: builder.questions,
            },
            report,
        ))
    }

    /// Build a corpus from already validated questions. Later duplicates of an
    /// id are dropped.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Empty` if `questions` is empty.
    pub fn from_questions(
        questions: impl IntoIterator<Item = Question>,
    ) -> Result<Self, CorpusError> {
        let mut builder = CorpusBuilder::default();
        for question in questions {
            if let Err(reason) = builder.push(question) {
                warn!("skipping question: {reason}");
            }
        }

        if builder.questions.is_empty() {
            return Err(CorpusError::Empty {
                report: LoadReport::default(),
            });
        }
        Ok(Self {
            questions: builder.questions,
        })
    }
}

impl QuestionRepository for InMemoryQuestionRepository {
    fn all(&self) -> Vec<Question> {
        self.questions.clone()
    }

    fn by_topic(&self, topic: Topic) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.topic() == topic)
            .cloned()
            .collect()
    }

    fn count(&self) -> usize {
        self.questions.len()
    }

    fn count_by_topic(&self, topic: Topic) -> usize {
        self.questions.iter().filter(|q| q.topic() == topic).count()
    }
}

#[derive(Default)]
struct CorpusBuilder {
    questions: Vec<Question>,
    seen: HashSet<QuestionId>,
}

impl CorpusBuilder {
    fn push(&mut self, question: Question) -> Result<(), RecordError> {
        if !self.seen.insert(question.id().clone()) {
            return Err(RecordError::DuplicateId(question.id().to_string()));
        }
        self.questions.push(question);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BundledCorpus, BytesSource};
    use serde_json::json;

    fn record(id: &str, topic: &str) -> serde_json::Value {
        json!({
            "id": id,
            "topic": topic,
            "difficulty": 1,
            "text": format!("Question {id}"),
            "choices": ["A", "B", "C", "D"],
            "correctIndex": 0,
            "explanation": "Because.",
            "reference": "Handbook"
        })
    }

    fn source(name: &str, records: serde_json::Value) -> BoxedSource {
        Box::new(BytesSource::new(name, serde_json::to_vec(&records).unwrap()))
    }

    #[test]
    fn corrupt_source_is_skipped() {
        let sources = vec![
            source(
                "SIGNS",
                json!([record("TX-SIG-0001", "SIGNS"), record("TX-SIG-0002", "SIGNS")]),
            ),
            Box::new(BytesSource::new("PARKING", "[{ this is not json")) as BoxedSource,
            source("SAFE_DRIVING", json!([record("TX-SAF-0001", "SAFE_DRIVING")])),
        ];

        let (repo, report) = InMemoryQuestionRepository::load(&sources).unwrap();

        assert_eq!(repo.count(), 3);
        assert_eq!(report.loaded(), 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, "PARKING");
        assert!(!report.is_clean());
    }

    #[test]
    fn all_sources_corrupt_is_empty_corpus() {
        let sources = vec![
            Box::new(BytesSource::new("SIGNS", "nope")) as BoxedSource,
            Box::new(BytesSource::new("PARKING", "")) as BoxedSource,
        ];

        let err = InMemoryQuestionRepository::load(&sources).unwrap_err();
        let CorpusError::Empty { report } = err;
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn no_sources_is_empty_corpus() {
        assert!(InMemoryQuestionRepository::load(&[]).is_err());
    }

    #[test]
    fn bad_records_are_skipped_individually() {
        let mut short = record("TX-SIG-0002", "SIGNS");
        short["choices"] = json!(["A", "B"]);
        let mut out_of_range = record("TX-SIG-0003", "SIGNS");
        out_of_range["correctIndex"] = json!(4);

        let sources = vec![source(
            "SIGNS",
            json!([record("TX-SIG-0001", "SIGNS"), short, out_of_range, record("TX-SIG-0004", "SIGNS")]),
        )];

        let (repo, report) = InMemoryQuestionRepository::load(&sources).unwrap();
        assert_eq!(repo.count(), 2);
        let positions: Vec<_> = report.rejected.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let mut later = record("TX-SIG-0001", "SIGNS");
        later["text"] = json!("A different question reusing the id");
        let sources = vec![
            source("SIGNS", json!([record("TX-SIG-0001", "SIGNS")])),
            source("EXTRA", json!([later])),
        ];

        let (repo, report) = InMemoryQuestionRepository::load(&sources).unwrap();
        assert_eq!(repo.count(), 1);
        assert_eq!(repo.all()[0].text(), "Question TX-SIG-0001");
        assert_eq!(report.sources[1].loaded, 0);
        assert_eq!(
            report.rejected[0].reason,
            RecordError::DuplicateId("TX-SIG-0001".into())
        );
    }

    #[test]
    fn id_code_must_match_topic() {
        let sources = vec![source(
            "SIGNS",
            json!([record("TX-PRK-0001", "SIGNS"), record("TX-SIG-0001", "SIGNS")]),
        )];

        let (repo, report) = InMemoryQuestionRepository::load(&sources).unwrap();
        assert_eq!(repo.count(), 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].position, 0);
        assert_eq!(
            report.rejected[0].reason,
            RecordError::IdMismatch {
                id: "TX-PRK-0001".into(),
                expected: "SIG",
            }
        );
    }

    #[test]
    fn topic_queries_preserve_corpus_order() {
        let sources = vec![source(
            "MIXED",
            json!([
                record("TX-SIG-0001", "SIGNS"),
                record("TX-PRK-0001", "PARKING"),
                record("TX-SIG-0002", "SIGNS"),
            ]),
        )];

        let (repo, _) = InMemoryQuestionRepository::load(&sources).unwrap();
        let ids: Vec<_> = repo
            .by_topic(Topic::Signs)
            .iter()
            .map(|q| q.id().to_string())
            .collect();
        assert_eq!(ids, vec!["TX-SIG-0001", "TX-SIG-0002"]);
        assert!(repo.by_topic(Topic::RightOfWay).is_empty());
        assert_eq!(repo.count_by_topic(Topic::RightOfWay), 0);
    }

    #[test]
    fn all_returns_an_independent_copy() {
        let sources = vec![source("SIGNS", json!([record("TX-SIG-0001", "SIGNS")]))];
        let (repo, _) = InMemoryQuestionRepository::load(&sources).unwrap();

        let mut copy = repo.all();
        copy.clear();
        assert_eq!(repo.count(), 1);
    }

    #[test]
    fn bundled_corpus_counts_add_up() {
        let (repo, report) = InMemoryQuestionRepository::load(&BundledCorpus::sources()).unwrap();
        assert!(report.is_clean(), "{report:?}");

        let per_topic: usize = Topic::ALL.iter().map(|t| repo.count_by_topic(*t)).sum();
        assert_eq!(repo.count(), per_topic);
        for topic in Topic::ALL {
            assert!(repo.count_by_topic(topic) > 0, "no questions for {topic}");
        }
    }

    #[test]
    fn from_questions_drops_duplicates() {
        let sources = vec![source("SIGNS", json!([record("TX-SIG-0001", "SIGNS")]))];
        let (repo, _) = InMemoryQuestionRepository::load(&sources).unwrap();
        let question = repo.all().remove(0);

        let rebuilt =
            InMemoryQuestionRepository::from_questions(vec![question.clone(), question]).unwrap();
        assert_eq!(rebuilt.count(), 1);
        assert!(InMemoryQuestionRepository::from_questions(Vec::new()).is_err());
    }
}
