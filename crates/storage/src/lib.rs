#![forbid(unsafe_code)]

pub mod record;
pub mod repository;
pub mod source;

pub use record::{QuestionRecord, RecordError};
pub use repository::{
    CorpusError, InMemoryQuestionRepository, LoadReport, QuestionRepository, RejectedRecord,
    SourceFailure, SourceLoad,
};
pub use source::{
    BoxedSource, BundledCorpus, BytesSource, CorpusSource, FileSource, SourceError,
    topic_file_sources,
};
