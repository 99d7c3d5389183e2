/// Lowercased labels of the rating scale. Rows carrying one of these are
/// scale options that bled into the question column.
const OPTION_LABELS: &[&str] = &[
    "strongly disagree",
    "disagree",
    "neutral",
    "agree",
    "strongly agree",
];

/// Substrings marking section and demographic headers. Matched anywhere
/// in the lowercased text, so "age" also hits "manager".
const SECTION_MARKERS: &[&str] = &[
    "about you",
    "overall experience",
    "your role",
    "overall rating",
    "gender",
    "tenure",
    "designation",
    "level",
    "age",
    "section",
    "instructions",
];

const TOPIC_PREFIX: &str = "topic:";

/// Questions must be longer than this many characters.
const MIN_QUESTION_CHARS: usize = 10;

/// What a single non-empty first-column cell turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// `Topic: <name>`; carries the trimmed name.
    Category(String),
    RatingOption,
    SectionHeader,
    Question,
    /// Short text that matched nothing else.
    Noise,
}

/// Classify trimmed, non-empty cell text. Rules are tried in order and
/// the first hit wins.
pub fn classify(text: &str) -> RowKind {
    if let Some(name) = strip_topic(text) {
        return RowKind::Category(name.trim().to_string());
    }

    let lower = text.to_lowercase();
    if OPTION_LABELS.contains(&lower.as_str()) {
        return RowKind::RatingOption;
    }
    if SECTION_MARKERS.iter().any(|m| lower.contains(m)) {
        return RowKind::SectionHeader;
    }
    if text.chars().count() > MIN_QUESTION_CHARS {
        return RowKind::Question;
    }
    RowKind::Noise
}

fn strip_topic(text: &str) -> Option<&str> {
    let head = text.get(..TOPIC_PREFIX.len())?;
    head.eq_ignore_ascii_case(TOPIC_PREFIX)
        .then(|| &text[TOPIC_PREFIX.len()..])
}
