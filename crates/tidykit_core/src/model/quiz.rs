//! Quiz question record.

use serde::{Deserialize, Serialize};

/// One multiple-choice question as bundled in `quiz_questions.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub emoji: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}
