use std::collections::BTreeSet;

use tracing::debug;

use super::{classify, QuestionItem, RowKind, DEFAULT_CATEGORY};
use crate::table::RawTable;

/// Fold state for one pass over the questions sheet: the category in
/// effect and how many questions have been emitted so far.
#[derive(Debug, Clone)]
pub struct Extractor {
    category: String,
    emitted: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            emitted: 0,
        }
    }
}

impl Extractor {
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Feed one row. Only the first cell is looked at.
    pub fn step(&mut self, row: &[String]) -> Option<QuestionItem> {
        let text = row.first()?.trim();
        if text.is_empty() {
            return None;
        }

        match classify(text) {
            RowKind::Category(name) => {
                self.category = name;
                debug!(category = %self.category(), "category");
                None
            }
            RowKind::Question => {
                self.emitted += 1;
                Some(QuestionItem::rating(self.emitted, text, &self.category))
            }
            RowKind::RatingOption | RowKind::SectionHeader | RowKind::Noise => None,
        }
    }
}

/// Rebuild the question list from the first column of `table`.
/// Every row is scanned, including row 0: the sheet has no header.
pub fn extract(table: &RawTable) -> Vec<QuestionItem> {
    let mut state = Extractor::default();
    table.iter().filter_map(|row| state.step(row)).collect()
}

/// Distinct categories among `items`, sorted.
pub fn categories(items: &[QuestionItem]) -> Vec<String> {
    items
        .iter()
        .map(|q| q.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
