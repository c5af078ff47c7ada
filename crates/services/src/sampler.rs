use log::debug;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::{Rng, rng};

use quiz_core::model::{Question, Topic};
use storage::repository::QuestionRepository;

use crate::config::QuizConfig;

/// Picks the ordered question sequence for a quiz session.
///
/// The candidate pool is shuffled with a Fisher–Yates shuffle, so every
/// ordering is equally likely, and then truncated to the requested count.
/// Asking for more questions than the pool holds yields the whole pool.
#[derive(Debug)]
pub struct SessionSampler<R = ThreadRng> {
    rng: R,
}

impl SessionSampler<ThreadRng> {
    #[must_use]
    pub fn new() -> Self {
        Self { rng: rng() }
    }
}

impl Default for SessionSampler<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SessionSampler<R> {
    /// Sample with a caller-provided generator, e.g. a seeded `StdRng`.
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Up to `count` distinct questions, from one topic or from all of them.
    ///
    /// Returns fewer than `count` when the pool is smaller, and an empty
    /// sequence when the pool is empty or `count` is zero.
    pub fn sample(
        &mut self,
        repository: &dyn QuestionRepository,
        topic: Option<Topic>,
        count: usize,
    ) -> Vec<Question> {
        self.take_shuffled(pool(repository, topic), count)
    }

    /// Like `sample`, but also restricted to the config's difficulty window.
    pub fn sample_config(
        &mut self,
        repository: &dyn QuestionRepository,
        config: &QuizConfig,
    ) -> Vec<Question> {
        let range = config.difficulty_range();
        let candidates = pool(repository, config.topic)
            .into_iter()
            .filter(|q| range.contains(&q.difficulty()))
            .collect();
        self.take_shuffled(candidates, config.question_count)
    }

    fn take_shuffled(&mut self, mut candidates: Vec<Question>, count: usize) -> Vec<Question> {
        let available = candidates.len();
        candidates.shuffle(&mut self.rng);
        candidates.truncate(count);
        debug!(
            "sampled {} of {} requested questions from a pool of {}",
            candidates.len(),
            count,
            available
        );
        candidates
    }
}

fn pool(repository: &dyn QuestionRepository, topic: Option<Topic>) -> Vec<Question> {
    match topic {
        Some(topic) => repository.by_topic(topic),
        None => repository.all(),
    }
}
