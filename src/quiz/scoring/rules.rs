use super::super::domain::{Answer, Question, QuestionKind, BOOLEAN_TRUE_POINTS};

/// Points an answer earns before the question weight is applied.
///
/// Returns `None` when the answer variant does not fit the question kind.
pub(crate) fn raw_points(question: &Question, answer: &Answer) -> Option<f64> {
    match (question.kind, answer) {
        (QuestionKind::Scale, Answer::Scale(value)) => Some(f64::from(*value)),
        (QuestionKind::Boolean, Answer::Boolean(value)) => {
            Some(if *value { BOOLEAN_TRUE_POINTS } else { 0.0 })
        }
        (QuestionKind::MultipleChoice, Answer::Choice(value)) => Some(*value),
        (QuestionKind::MultipleSelect, Answer::Selection(selected)) => {
            // Averaged, so adding low-value options can pull the contribution down.
            if selected.is_empty() {
                Some(0.0)
            } else {
                let sum: f64 = selected.iter().map(|option| option.value).sum();
                Some(sum / selected.len() as f64)
            }
        }
        _ => None,
    }
}

pub(crate) fn contribution(question: &Question, answer: &Answer) -> Option<f64> {
    raw_points(question, answer).map(|points| points * question.weight)
}
