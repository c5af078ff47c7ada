//! Corpus sources: named byte streams of question records.
//!
//! The repository does not care where bytes come from. Files on disk, the
//! bundled default corpus and in-memory buffers all implement `CorpusSource`.

use std::path::{Path, PathBuf};

use include_dir::{Dir, include_dir};
use quiz_core::model::Topic;
use thiserror::Error;

static BUNDLED_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/corpus");

/// Failure to obtain or decode one source. Non-fatal during a corpus load.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source not found: {0}")]
    Missing(String),

    #[error("malformed document in {name}: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A named stream of question records.
pub trait CorpusSource {
    /// Name used in logs and load reports.
    fn name(&self) -> &str;

    /// Read the raw bytes of the source.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the bytes cannot be obtained.
    fn read(&self) -> Result<Vec<u8>, SourceError>;
}

pub type BoxedSource = Box<dyn CorpusSource>;

/// A source backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CorpusSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<Vec<u8>, SourceError> {
        std::fs::read(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// A source backed by an in-memory buffer.
#[derive(Debug, Clone)]
pub struct BytesSource {
    name: String,
    bytes: Vec<u8>,
}

impl BytesSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl CorpusSource for BytesSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<Vec<u8>, SourceError> {
        Ok(self.bytes.clone())
    }
}

/// One file source per topic: `<dir>/<topic file stem>.json`.
#[must_use]
pub fn topic_file_sources(dir: &Path) -> Vec<BoxedSource> {
    Topic::ALL
        .into_iter()
        .map(|topic| {
            let file_name = format!("{}.json", topic.file_stem());
            Box::new(FileSource::new(topic.tag(), dir.join(file_name))) as BoxedSource
        })
        .collect()
}

/// The default corpus compiled into the binary.
pub struct BundledCorpus;

impl BundledCorpus {
    /// One source per topic, read from the embedded corpus directory.
    #[must_use]
    pub fn sources() -> Vec<BoxedSource> {
        Topic::ALL
            .into_iter()
            .map(|topic| Box::new(BundledSource { topic }) as BoxedSource)
            .collect()
    }
}

struct BundledSource {
    topic: Topic,
}

impl CorpusSource for BundledSource {
    fn name(&self) -> &str {
        self.topic.tag()
    }

    fn read(&self) -> Result<Vec<u8>, SourceError> {
        let file_name = format!("{}.json", self.topic.file_stem());
        BUNDLED_DIR
            .get_file(&file_name)
            .map(|file| file.contents().to_vec())
            .ok_or(SourceError::Missing(file_name))
    }
}
