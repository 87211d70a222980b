use super::common::*;
use crate::quiz::domain::{Answer, AnswerError, LeadInfo, QuestionId};
use crate::quiz::lead::LeadGate;
use crate::quiz::session::{QuizSession, QuizState, SessionError};

fn answer_perfectly(session: &mut QuizSession) {
    let answers = perfect_readiness_answers();
    while let Some(question) = session.current_question().cloned() {
        let answer = answers.get(&question.id).cloned().expect("answer for question");
        session.answer(answer).expect("accepted");
    }
}

#[test]
fn new_session_starts_at_the_first_question() {
    let session = QuizSession::new(readiness());
    assert_eq!(session.state(), &QuizState::Answering { index: 0 });
    assert_eq!(session.current_question().map(|q| q.id.as_str()), Some("motivation"));
    assert!(session.answers().is_empty());
}

#[test]
fn scale_answer_advances_to_the_next_question() {
    let mut session = QuizSession::new(readiness());
    let state = session.answer(Answer::Scale(8)).expect("accepted").clone();

    assert_eq!(state, QuizState::Answering { index: 1 });
    assert_eq!(
        session.answers().get(&QuestionId::new("motivation")),
        Some(&Answer::Scale(8))
    );
}

#[test]
fn wrong_answer_shape_is_rejected_without_moving() {
    let mut session = QuizSession::new(readiness());
    let error = session.answer(Answer::Boolean(true)).expect_err("scale expected");

    assert!(matches!(
        error,
        SessionError::Answer(AnswerError::KindMismatch { .. })
    ));
    assert_eq!(session.current_index(), Some(0));
    assert!(session.answers().is_empty());
}

#[test]
fn out_of_range_scale_is_rejected() {
    let mut session = QuizSession::new(readiness());
    let error = session.answer(Answer::Scale(11)).expect_err("above scale");
    assert!(matches!(
        error,
        SessionError::Answer(AnswerError::ScaleOutOfRange { value: 11, .. })
    ));
}

#[test]
fn back_keeps_earlier_answers_and_stops_at_the_first_question() {
    let mut session = QuizSession::new(readiness());
    session.answer(Answer::Scale(6)).expect("accepted");
    session.answer(Answer::Scale(4)).expect("accepted");

    assert_eq!(
        session.back().expect("stepped back"),
        &QuizState::Answering { index: 1 }
    );
    assert_eq!(session.answers().len(), 2);

    session.answer(Answer::Scale(9)).expect("re-answered");
    assert_eq!(
        session.answers().get(&QuestionId::new("education_passion")),
        Some(&Answer::Scale(9))
    );

    session.back().expect("stepped back");
    session.back().expect("stepped back");
    assert_eq!(session.back(), Err(SessionError::AtFirstQuestion));
}

#[test]
fn completing_the_last_question_produces_the_outcome() {
    let mut session = QuizSession::new(readiness());
    answer_perfectly(&mut session);

    let outcome = session.state().outcome().expect("completed");
    assert_eq!(session.state().label(), "completed");
    assert_eq!(outcome.score, 100.0);
    assert_eq!(outcome.max_score, 100.0);
    assert_eq!(outcome.result.title, "Potpuno ste spremni");
    assert_eq!(outcome.answered, 8);
}

#[test]
fn answering_after_completion_is_refused() {
    let mut session = QuizSession::new(readiness());
    answer_perfectly(&mut session);

    assert_eq!(
        session.answer(Answer::Scale(5)),
        Err(SessionError::NotAnswering("completed"))
    );
}

#[test]
fn multiple_select_waits_for_next_and_toggles_options() {
    let mut session = QuizSession::new(model_fit());
    session.select_option(1).expect("budget picked");
    session.select_option(2).expect("space picked");
    assert_eq!(session.current_index(), Some(2));

    session.select_option(0).expect("selected");
    session.select_option(3).expect("selected");
    session.select_option(0).expect("deselected");
    assert_eq!(session.current_index(), Some(2));

    let programs = session
        .answers()
        .get(&QuestionId::new("programs"))
        .cloned()
        .expect("selection recorded");
    match programs {
        Answer::Selection(selected) => {
            assert_eq!(selected.len(), 1);
            assert_eq!(selected[0].text, "Programiranje");
        }
        other => panic!("unexpected answer {other:?}"),
    }

    session.next().expect("advanced");
    assert_eq!(session.current_index(), Some(3));
}

#[test]
fn next_on_untouched_select_records_an_empty_selection() {
    let mut session = QuizSession::new(model_fit());
    session.select_option(0).expect("budget picked");
    session.select_option(0).expect("space picked");
    session.next().expect("advanced past programs");
    session.select_option(0).expect("team picked");

    assert_eq!(
        session.answers().get(&QuestionId::new("programs")),
        Some(&Answer::Selection(Vec::new()))
    );
    let outcome = session.state().outcome().expect("completed");
    assert_eq!(outcome.score, 7.0);
    assert_eq!(outcome.result.title, "Mini centar");
}

#[test]
fn next_without_an_answer_is_refused_for_other_kinds() {
    let mut session = QuizSession::new(readiness());
    assert_eq!(
        session.next(),
        Err(SessionError::Unanswered(QuestionId::new("motivation")))
    );
}

#[test]
fn picking_an_option_on_a_scale_question_is_refused() {
    let mut session = QuizSession::new(readiness());
    assert!(matches!(
        session.select_option(0),
        Err(SessionError::Answer(AnswerError::UnknownOptionIndex { .. }))
    ));
}

#[test]
fn lead_capture_requires_a_completed_quiz() {
    let mut session = QuizSession::new(readiness());
    let error = session
        .capture_lead(&LeadGate::default(), lead())
        .expect_err("still answering");
    assert_eq!(error, SessionError::NotCompleted("answering"));
}

#[test]
fn invalid_lead_leaves_the_session_completed() {
    let mut session = QuizSession::new(readiness());
    answer_perfectly(&mut session);

    let bad = LeadInfo {
        name: String::new(),
        email: "nope".to_string(),
        phone: None,
    };
    let error = session
        .capture_lead(&LeadGate::default(), bad)
        .expect_err("invalid lead");
    assert!(matches!(error, SessionError::Lead(_)));
    assert_eq!(session.state().label(), "completed");
}

#[test]
fn captured_lead_carries_the_internal_score() {
    let mut session = QuizSession::new(readiness());
    answer_perfectly(&mut session);

    let capture = session
        .capture_lead(&LeadGate::default(), lead())
        .expect("captured");
    assert_eq!(capture.lead_score, 100);
    match session.state() {
        QuizState::LeadCaptured { outcome, capture } => {
            assert_eq!(outcome.result.title, "Potpuno ste spremni");
            assert_eq!(capture.lead.email, "jelena@example.rs");
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn retake_clears_every_answer() {
    let mut session = QuizSession::new(readiness());
    answer_perfectly(&mut session);
    session
        .capture_lead(&LeadGate::default(), lead())
        .expect("captured");

    assert_eq!(session.retake(), &QuizState::Answering { index: 0 });
    assert!(session.answers().is_empty());

    session.answer(Answer::Scale(1)).expect("accepted");
    assert_eq!(session.answers().len(), 1);
}
