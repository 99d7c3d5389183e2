// src/questions/mod.rs

pub mod classify;
pub mod extract;

pub use classify::{classify, RowKind};
pub use extract::{categories, extract, Extractor};

use serde::Serialize;

/// The five-point scale offered for every question, lowest first.
pub const RATING_SCALE: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];

pub const DEFAULT_CATEGORY: &str = "General";

/// A survey question reconstructed from the questions sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionItem {
    pub question_id: String,
    pub question_text: String,
    pub question_type: &'static str,
    pub options: Vec<&'static str>,
    pub category: String,
    pub required: bool,
}

impl QuestionItem {
    /// Build the `seq`-th (1-based) rating question.
    pub fn rating(seq: usize, text: &str, category: &str) -> Self {
        Self {
            question_id: format!("q{}", seq),
            question_text: text.to_string(),
            question_type: "rating",
            options: RATING_SCALE.to_vec(),
            category: category.to_string(),
            required: true,
        }
    }
}
