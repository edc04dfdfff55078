use std::sync::Arc;

use compass_harness::axis::{Axis, AxisScores, NEUTRAL_SCORE};
use compass_harness::bank::{AnswerOption, Question, QuestionBank};
use compass_harness::error::SequenceError;
use compass_harness::sampler::{sample, Sampler};
use compass_harness::scoring::{score, score_breakdown};
use compass_harness::session::{Answer, ResponseCollector, SessionState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn answer(axis: Axis, score: i8) -> Answer {
    Answer {
        question_id: 0,
        question_text: String::new(),
        chosen_option_text: String::new(),
        axis,
        score,
    }
}

/// Random completed session: sampled questions, random option per question.
fn random_session(rng: &mut StdRng) -> Vec<Answer> {
    let sampler = Sampler::builtin().unwrap();
    let mut collector = ResponseCollector::start(&sampler, rng);
    while let Some(question) = collector.current_question() {
        let pick = rng.gen_range(0..question.options.len());
        collector.submit(pick).unwrap();
    }
    collector.finalize().unwrap()
}

#[test]
fn scores_are_bounded_and_deterministic() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let answers = random_session(&mut rng);
        let first = score(&answers);
        assert_eq!(first, score(&answers));
        for (_, value) in first.iter() {
            assert!(*value <= 100);
        }
    }
}

#[test]
fn untouched_axis_is_neutral() {
    let answers = vec![answer(Axis::Economy, 2), answer(Axis::Society, -1)];
    let scores = score(&answers);
    assert_eq!(scores.diplomacy, NEUTRAL_SCORE);
    assert_eq!(scores.approach, NEUTRAL_SCORE);
    assert_eq!(score(&[]), AxisScores::splat(NEUTRAL_SCORE));
}

#[test]
fn negating_every_answer_mirrors_scores() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let answers = random_session(&mut rng);
        let negated: Vec<Answer> = answers
            .iter()
            .map(|a| Answer {
                score: -a.score,
                ..a.clone()
            })
            .collect();

        let s = score(&answers);
        let n = score(&negated);
        for axis in Axis::ALL {
            // Exact halves round up on both sides (62.5 -> 63, 37.5 -> 38).
            let sum = i32::from(s[axis]) + i32::from(n[axis]);
            assert!((100..=101).contains(&sum), "{axis}: {sum}");
            assert_eq!(s[axis] > NEUTRAL_SCORE, n[axis] < NEUTRAL_SCORE, "{axis}");
        }
    }
}

#[test]
fn extreme_answers_hit_the_ends() {
    let all_high: Vec<Answer> = (0..4).map(|_| answer(Axis::Approach, 2)).collect();
    let all_low: Vec<Answer> = (0..4).map(|_| answer(Axis::Approach, -2)).collect();
    assert_eq!(score(&all_high).approach, 100);
    assert_eq!(score(&all_low).approach, 0);
}

/// One question per axis; option 0 weighs +2, option 3 weighs -2.
fn one_per_axis_bank() -> QuestionBank {
    let questions = Axis::ALL
        .iter()
        .zip(1u32..)
        .map(|(&axis, id)| Question {
            id,
            category: axis.label().to_string(),
            text: format!("{axis} question"),
            axis,
            options: [2i8, 1, -1, -2]
                .iter()
                .map(|&score| AnswerOption {
                    text: format!("weight {score}"),
                    score,
                })
                .collect(),
        })
        .collect();
    QuestionBank::new(questions).unwrap()
}

fn collect_all(sampler: &Sampler, seed: u64, option: usize) -> AxisScores<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut collector = ResponseCollector::start(sampler, &mut rng);
    while collector.current_question().is_some() {
        collector.submit(option).unwrap();
    }
    score(&collector.finalize().unwrap())
}

#[test]
fn sampled_extreme_sessions_hit_both_ends_on_every_axis() {
    let sampler = Sampler::new(Arc::new(one_per_axis_bank()), 4).unwrap();
    for seed in 0..10 {
        assert_eq!(collect_all(&sampler, seed, 0), AxisScores::splat(100));
        assert_eq!(collect_all(&sampler, seed, 3), AxisScores::splat(0));
    }
}

#[test]
fn mixed_answers_normalize_against_fixed_maximum() {
    // raw = 2 + 1 - 1 + 2 = 4, max = 8, round((0.5 + 1) * 50) = 75
    let answers = vec![
        answer(Axis::Economy, 2),
        answer(Axis::Economy, 1),
        answer(Axis::Economy, -1),
        answer(Axis::Economy, 2),
    ];
    let breakdown = score_breakdown(&answers);
    assert_eq!(breakdown.raw.economy, 4);
    assert_eq!(breakdown.max_magnitude.economy, 8);
    assert_eq!(breakdown.normalized.economy, 75);
}

#[test]
fn one_sided_negative_axis_is_not_compressed() {
    let answers = vec![answer(Axis::Society, -1), answer(Axis::Society, -1)];
    // raw = -2, max = 4: 25, not 0
    assert_eq!(score(&answers).society, 25);
}

#[test]
fn every_sampled_session_has_distinct_questions() {
    let bank = QuestionBank::builtin();
    let mut rng = StdRng::seed_from_u64(99);
    for k in [1, 5, 15, bank.len()] {
        let questions = sample(bank, k, &mut rng).unwrap();
        let mut ids: Vec<u32> = questions.iter().map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), k);
    }
}

#[test]
fn collector_enforces_sequence() {
    let sampler = Sampler::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let mut collector = ResponseCollector::start(&sampler, &mut rng);

    assert_eq!(
        collector.state(),
        SessionState::AwaitingAnswer {
            index: 0,
            total: 15
        }
    );
    assert!(matches!(
        collector.finalize(),
        Err(SequenceError::Incomplete {
            answered: 0,
            total: 15
        })
    ));
    assert!(matches!(
        collector.submit(9),
        Err(SequenceError::OptionOutOfRange { index: 9, .. })
    ));
    assert_eq!(collector.progress().answered, 0);

    for _ in 0..15 {
        collector.submit(3).unwrap();
    }
    assert_eq!(collector.state(), SessionState::Complete);
    assert!(matches!(
        collector.submit(0),
        Err(SequenceError::AlreadyComplete { answered: 15 })
    ));

    let answers = collector.finalize().unwrap();
    let expected: Vec<u32> = collector.questions().iter().map(|q| q.id).collect();
    let got: Vec<u32> = answers.iter().map(|a| a.question_id).collect();
    assert_eq!(got, expected);
}
