use super::common::*;
use crate::quiz::domain::{Answer, AnswerSet, QuestionId, QuestionKind};
use crate::quiz::scoring::QuizScorer;

fn score_single(question: crate::quiz::domain::Question, answer: Answer) -> f64 {
    let id = question.id.clone();
    let quiz = single_question_quiz(question);
    let answers: AnswerSet = [(id, answer)].into_iter().collect();
    QuizScorer::new().score(&quiz, &answers).total
}

#[test]
fn scale_answer_is_multiplied_by_weight() {
    let total = score_single(question("q", QuestionKind::Scale, 2.0), Answer::Scale(10));
    assert_eq!(total, 20.0);
}

#[test]
fn false_boolean_contributes_nothing_regardless_of_weight() {
    let total = score_single(
        question("q", QuestionKind::Boolean, 3.0),
        Answer::Boolean(false),
    );
    assert_eq!(total, 0.0);
}

#[test]
fn true_boolean_is_worth_ten_points_before_weight() {
    let total = score_single(
        question("q", QuestionKind::Boolean, 2.0),
        Answer::Boolean(true),
    );
    assert_eq!(total, 20.0);
}

#[test]
fn empty_selection_contributes_zero() {
    let mut select = question("q", QuestionKind::MultipleSelect, 2.0);
    select.options = vec![option("A", 2.0), option("B", 8.0)];
    let total = score_single(select, Answer::Selection(Vec::new()));
    assert_eq!(total, 0.0);
}

#[test]
fn selection_contributes_its_average_value() {
    let mut select = question("q", QuestionKind::MultipleSelect, 2.0);
    select.options = vec![option("A", 2.0), option("B", 2.0), option("C", 10.0)];

    let low = score_single(
        select.clone(),
        Answer::Selection(vec![option("A", 2.0), option("B", 2.0)]),
    );
    assert_eq!(low, 4.0);

    let mixed = score_single(
        select,
        Answer::Selection(vec![option("A", 2.0), option("C", 10.0)]),
    );
    assert_eq!(mixed, 12.0);
}

#[test]
fn multiple_choice_uses_the_option_value() {
    let mut choice = question("q", QuestionKind::MultipleChoice, 1.5);
    choice.options = vec![option("Mali", 4.0), option("Veliki", 8.0)];
    let total = score_single(choice, Answer::Choice(8.0));
    assert_eq!(total, 12.0);
}

#[test]
fn unanswered_questions_are_skipped() {
    let quiz = readiness();
    let mut answers = AnswerSet::new();
    answers.record(QuestionId::new("motivation"), Answer::Scale(7));

    let breakdown = QuizScorer::new().score(&quiz, &answers);
    assert_eq!(breakdown.total, 14.0);
    assert_eq!(breakdown.components.len(), 1);
    assert_eq!(breakdown.components[0].question, QuestionId::new("motivation"));
}

#[test]
fn mismatched_answers_are_left_out_of_the_total() {
    let quiz = readiness();
    let mut answers = AnswerSet::new();
    answers.record(QuestionId::new("motivation"), Answer::Boolean(true));
    answers.record(QuestionId::new("capital"), Answer::Boolean(true));

    let breakdown = QuizScorer::new().score(&quiz, &answers);
    assert_eq!(breakdown.total, 20.0);
    assert_eq!(breakdown.components.len(), 1);
}

#[test]
fn perfect_readiness_run_scores_one_hundred() {
    let quiz = readiness();
    let breakdown = QuizScorer::new().score(&quiz, &perfect_readiness_answers());
    assert_eq!(breakdown.total, 100.0);
    assert_eq!(breakdown.components.len(), quiz.len());
}

#[test]
fn scoring_is_deterministic() {
    let quiz = model_fit();
    let answers: AnswerSet = [
        (QuestionId::new("budget"), Answer::Choice(5.0)),
        (QuestionId::new("space"), Answer::Choice(8.0)),
        (
            QuestionId::new("programs"),
            Answer::Selection(vec![
                quiz.questions[2].options[0].clone(),
                quiz.questions[2].options[3].clone(),
            ]),
        ),
        (QuestionId::new("team"), Answer::Choice(6.0)),
    ]
    .into_iter()
    .collect();

    let scorer = QuizScorer::new();
    let first = scorer.score(&quiz, &answers);
    let second = scorer.score(&quiz, &answers);
    assert_eq!(first, second);
    assert_eq!(first.total, 5.0 + 8.0 + 16.0 + 6.0);
}
