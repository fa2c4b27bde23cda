use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Persisted, Placeholder};

/// Which pool a test question lives in. The record shape is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionPool {
    Sample,
    Final,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestQuestion {
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TestQuestion {
    /// Position of `correct_answer` within `answers`.
    /// `None` renders as an unselected radio group.
    pub fn correct_index(&self) -> Option<usize> {
        correct_index(&self.answers, &self.correct_answer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer: String,
}

impl QuestionDraft {
    pub fn correct_index(&self) -> Option<usize> {
        correct_index(&self.answers, &self.correct_answer)
    }
}

fn correct_index(answers: &[String], correct: &str) -> Option<usize> {
    answers.iter().position(|a| a == correct)
}

impl Persisted for TestQuestion {
    type Draft = QuestionDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> QuestionDraft {
        QuestionDraft {
            question: self.question.clone(),
            answers: self.answers.clone(),
            correct_answer: self.correct_answer.clone(),
        }
    }
}

impl Placeholder for QuestionDraft {
    fn placeholder() -> Self {
        let answers: Vec<String> = (1..=4).map(|n| format!("Answer {n}")).collect();
        Self {
            question: "New Question".to_string(),
            correct_answer: answers[0].clone(),
            answers,
        }
    }
}
