use serde::Serialize;

use crate::models::{QuestionPool, TestQuestion};

/// Percentage at or above which a test counts as passed.
pub const PASS_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    /// Rounded to a whole number. `NaN` when `total == 0`.
    pub percentage: f64,
}

impl Score {
    /// `NaN` never passes.
    pub fn passed(&self) -> bool {
        self.percentage >= PASS_THRESHOLD
    }

    /// Result banner wording. Practice tests encourage, final tests grade.
    pub fn verdict(&self, pool: QuestionPool) -> &'static str {
        match (pool, self.passed()) {
            (QuestionPool::Sample, true) => "Well Done",
            (QuestionPool::Sample, false) => "Keep Practicing",
            (QuestionPool::Final, true) => "Passed",
            (QuestionPool::Final, false) => "Not Passed",
        }
    }

    pub fn percentage_label(&self) -> String {
        format!("{}%", self.percentage)
    }
}

/// Scores submitted answers against the question list by position.
///
/// An unanswered slot (`None`) or a missing trailing answer never matches.
/// An empty question list yields `percentage = NaN`; callers decide how to
/// show it.
pub fn score(answers: &[Option<String>], questions: &[TestQuestion]) -> Score {
    let total = questions.len();
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| {
            answers
                .get(*i)
                .and_then(|a| a.as_deref())
                .is_some_and(|a| a == q.correct_answer)
        })
        .count();

    Score {
        correct,
        total,
        percentage: (correct as f64 / total as f64 * 100.0).round(),
    }
}
