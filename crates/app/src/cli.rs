use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use quiz_core::model::Topic;
use services::{ConfigError, QuizConfig};

/// Texas driving-knowledge practice quiz
#[derive(Parser, Debug)]
#[command(name = "quiz", version, about)]
pub struct Cli {
    /// directory holding one `<topic>.json` file per topic (defaults to the bundled corpus)
    #[arg(long, env = "QUIZ_CORPUS_DIR", global = true)]
    pub corpus: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// take a quiz on the terminal (default)
    Run(RunArgs),
    /// list topics and how many questions each has
    Topics,
    /// load the corpus and report every skipped source or record
    Validate,
}

#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// JSON quiz config; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// restrict questions to one topic, e.g. `parking` or `RIGHT_OF_WAY`
    #[arg(short, long)]
    pub topic: Option<Topic>,

    /// number of questions
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// lowest difficulty to include (1-5)
    #[arg(long)]
    pub min_difficulty: Option<u8>,

    /// highest difficulty to include (1-5)
    #[arg(long)]
    pub max_difficulty: Option<u8>,

    /// seed for a reproducible question order
    #[arg(long)]
    pub seed: Option<u64>,
}

impl RunArgs {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn quiz_config(&self) -> Result<QuizConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => QuizConfig::from_json_file(path)?,
            None => QuizConfig::default(),
        };
        if self.topic.is_some() {
            config.topic = self.topic;
        }
        if let Some(count) = self.count {
            config.question_count = count;
        }
        if let Some(min) = self.min_difficulty {
            config.min_difficulty = min;
        }
        if let Some(max) = self.max_difficulty {
            config.max_difficulty = max;
        }
        config.validate()?;
        Ok(config)
    }
}

impl Cli {
    #[must_use]
    pub fn corpus_dir(&self) -> Option<&Path> {
        self.corpus.as_deref()
    }
}
