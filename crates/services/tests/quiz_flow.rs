use std::sync::Arc;

use quiz_core::model::Topic;
use quiz_core::time::fixed_clock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{QuizConfig, QuizService, SessionError, SessionSampler};
use storage::repository::{InMemoryQuestionRepository, QuestionRepository};
use storage::source::BundledCorpus;

fn bundled_service() -> QuizService {
    let (repo, report) = InMemoryQuestionRepository::load(&BundledCorpus::sources()).expect("load");
    assert!(report.is_clean());
    QuizService::new(fixed_clock(), Arc::new(repo))
}

#[test]
fn perfect_run_over_bundled_corpus_passes() {
    let service = bundled_service();
    let config = QuizConfig {
        question_count: 10,
        ..QuizConfig::default()
    };
    let mut sampler = SessionSampler::with_rng(StdRng::seed_from_u64(11));
    let mut session = service.start_session_with(&config, &mut sampler).expect("start");

    while !session.is_complete() {
        let correct = session.current_question().expect("question").correct_index();
        let feedback = session.submit_answer(correct).expect("answer");
        assert!(feedback.correct);
        session.advance().expect("advance");
    }

    let report = service.finish(&session).expect("finish");
    assert_eq!(report.summary.percentage(), 100);
    assert!(report.summary.passed());
    assert!(report.missed.is_empty());
    assert_eq!(
        report.topics.iter().map(|t| t.answered).sum::<usize>(),
        10
    );
}

#[test]
fn wrong_answers_fail_and_are_listed() {
    let service = bundled_service();
    let config = QuizConfig {
        topic: Some(Topic::Parking),
        ..QuizConfig::default()
    };
    let mut session = service.start_session(&config).expect("start");
    let total = service.questions().count_by_topic(Topic::Parking);
    assert_eq!(session.len(), total);

    while !session.is_complete() {
        let wrong = (session.current_question().expect("question").correct_index() + 1) % 4;
        session.submit_answer(wrong).expect("answer");
        // resubmitting the right answer must not rescore
        let correct = session.current_question().expect("question").correct_index();
        assert!(!session.submit_answer(correct).expect("answer").correct);
        session.advance().expect("advance");
    }

    let report = service.finish(&session).expect("finish");
    assert_eq!(report.summary.correct(), 0);
    assert!(!report.summary.passed());
    assert_eq!(report.missed.len(), total);
    assert!(report.missed.iter().all(|m| m.topic == Topic::Parking));
}

#[test]
fn skipping_is_not_allowed() {
    let service = bundled_service();
    let mut session = service.start_session(&QuizConfig::default()).expect("start");
    assert!(matches!(session.advance(), Err(SessionError::NotAnswered)));
    assert_eq!(session.progress().position, 1);
}
