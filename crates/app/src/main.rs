mod cli;
mod console;

use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::info;
use quiz_core::model::Topic;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{Clock, QuizService, SessionReport, SessionSampler};
use storage::repository::{CorpusError, InMemoryQuestionRepository, LoadReport, QuestionRepository};
use storage::source::{BoxedSource, BundledCorpus, topic_file_sources};

use crate::cli::{Cli, Command, RunArgs};
use crate::console::{Outcome, describe_config, run_session, write_report};

fn corpus_sources(dir: Option<&Path>) -> Vec<BoxedSource> {
    match dir {
        Some(dir) => {
            info!("loading corpus from {}", dir.display());
            topic_file_sources(dir)
        }
        None => BundledCorpus::sources(),
    }
}

fn load_corpus(dir: Option<&Path>) -> Result<InMemoryQuestionRepository, CorpusError> {
    InMemoryQuestionRepository::load(&corpus_sources(dir)).map(|(repo, _)| repo)
}

fn run_quiz(corpus: Option<&Path>, args: &RunArgs) -> Result<ExitCode, Box<dyn Error>> {
    let config = args.quiz_config()?;
    println!("{}", describe_config(&config));
    let service = QuizService::new(Clock::system(), Arc::new(load_corpus(corpus)?));

    let mut session = match args.seed {
        Some(seed) => service
            .start_session_with(&config, &mut SessionSampler::with_rng(StdRng::seed_from_u64(seed)))?,
        None => service.start_session(&config)?,
    };
    if session.len() < config.question_count {
        println!(
            "Only {} matching questions available; the quiz is shorter than requested.",
            session.len()
        );
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let outcome = run_session(&mut session, stdin.lock(), &mut stdout)?;

    let report = match outcome {
        Outcome::Finished => service.finish(&session)?,
        Outcome::Quit => {
            writeln!(stdout)?;
            writeln!(stdout, "Quiz ended early.")?;
            SessionReport::from_session(&session)?
        }
    };
    write_report(&report, &mut stdout)?;
    Ok(ExitCode::SUCCESS)
}

fn list_topics(corpus: Option<&Path>) -> Result<ExitCode, Box<dyn Error>> {
    let repo = load_corpus(corpus)?;
    for topic in Topic::ALL {
        println!(
            "{:<20} {:<20} {:>4}",
            topic.display_name(),
            topic.tag(),
            repo.count_by_topic(topic)
        );
    }
    println!("{:<41} {:>4}", "Total", repo.count());
    Ok(ExitCode::SUCCESS)
}

fn print_load_report(report: &LoadReport) {
    for source in &report.sources {
        println!("ok      {:<20} {} questions", source.source, source.loaded);
    }
    for failure in &report.failures {
        println!("failed  {:<20} {}", failure.source, failure.error);
    }
    for rejected in &report.rejected {
        println!(
            "skipped {:<20} record {}: {}",
            rejected.source, rejected.position, rejected.reason
        );
    }
}

fn validate(corpus: Option<&Path>) -> ExitCode {
    match InMemoryQuestionRepository::load(&corpus_sources(corpus)) {
        Ok((repo, report)) => {
            print_load_report(&report);
            println!("{} questions loaded", repo.count());
            if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(CorpusError::Empty { report }) => {
            print_load_report(&report);
            eprintln!("no questions could be loaded");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let corpus = cli.corpus_dir();
    let result = match &cli.command {
        None => run_quiz(corpus, &RunArgs::default()),
        Some(Command::Run(args)) => run_quiz(corpus, args),
        Some(Command::Topics) => list_topics(corpus),
        Some(Command::Validate) => Ok(validate(corpus)),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
