use super::super::domain::{Answer, AnswerSet, QuizType, ResultBucket};
use super::config::LeadScoreConfig;

pub const LEAD_SCORE_MIN: f64 = 0.0;
pub const LEAD_SCORE_MAX: f64 = 100.0;

/// Numeric answers above this count as enthusiastic.
const POSITIVE_THRESHOLD: f64 = 7.0;

/// Rough 0–100 interest estimate used to order leads in the CRM. Never shown to visitors.
pub(crate) fn lead_score(
    config: &LeadScoreConfig,
    quiz_type: QuizType,
    bucket: &ResultBucket,
    answers: &AnswerSet,
) -> u8 {
    let mut score = config.base;

    if quiz_type == QuizType::Readiness {
        let title = bucket.title.to_lowercase();
        if contains_any(&title, &config.ready_keywords) {
            score += config.ready_bonus;
        } else if contains_any(&title, &config.potential_keywords) {
            score += config.potential_bonus;
        }
    }

    score += positive_fraction(answers) * config.positive_answer_weight;

    score.clamp(LEAD_SCORE_MIN, LEAD_SCORE_MAX).round() as u8
}

fn contains_any(title: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| title.contains(&keyword.to_lowercase()))
}

fn is_positive(answer: &Answer) -> bool {
    match answer {
        Answer::Boolean(value) => *value,
        Answer::Scale(value) => f64::from(*value) > POSITIVE_THRESHOLD,
        Answer::Choice(value) => *value > POSITIVE_THRESHOLD,
        Answer::Selection(_) => true,
    }
}

fn positive_fraction(answers: &AnswerSet) -> f64 {
    if answers.is_empty() {
        return 0.0;
    }
    let positive = answers.answers().filter(|answer| is_positive(answer)).count();
    positive as f64 / answers.len() as f64
}
