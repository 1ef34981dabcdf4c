//! Keyword-count feedback classifier
//!
//! Lower-cases the text and counts substring occurrences of the positive
//! and negative keywords; the larger count wins, a tie is neutral.
//!
//! The shipped keyword sets overlap (a bare negation is itself a negative
//! keyword and also occurs inside longer phrases), so ties are common.
//! That is a known limit of this heuristic, not something the classifier
//! compensates for.

use serde::{Deserialize, Serialize};

/// Coarse sentiment of a feedback utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Labels feedback text; swappable for a model-backed implementation
pub trait FeedbackClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Sentiment;
}

/// Keyword lists for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackKeywords {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl FeedbackKeywords {
    pub fn english() -> Self {
        Self {
            positive: to_strings(&[
                "great",
                "thanks",
                "thank you",
                "excellent",
                "perfect",
                "awesome",
                "helpful",
                "love",
                "like it",
                "suits me",
            ]),
            negative: to_strings(&[
                "not",
                "bad",
                "doesn't suit",
                "don't like",
                "poor",
                "terrible",
                "awful",
                "useless",
                "wrong",
                "disappointed",
            ]),
        }
    }

    pub fn russian() -> Self {
        Self {
            positive: to_strings(&[
                "отлично",
                "хорошо",
                "спасибо",
                "понравил",
                "подходит",
                "супер",
                "замечательно",
            ]),
            negative: to_strings(&[
                "не ",
                "плохо",
                "не подходит",
                "не нравится",
                "ужасно",
                "неудобно",
            ]),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Substring-count classifier over configurable keyword sets
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: FeedbackKeywords,
}

impl KeywordClassifier {
    pub fn new(keywords: FeedbackKeywords) -> Self {
        let lower = |words: Vec<String>| -> Vec<String> {
            words
                .into_iter()
                .filter(|w| !w.is_empty())
                .map(|w| w.to_lowercase())
                .collect()
        };
        Self {
            keywords: FeedbackKeywords {
                positive: lower(keywords.positive),
                negative: lower(keywords.negative),
            },
        }
    }

    fn count(text: &str, keywords: &[String]) -> usize {
        keywords.iter().map(|kw| text.matches(kw.as_str()).count()).sum()
    }
}

impl FeedbackClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Sentiment {
        let lowered = text.to_lowercase();
        let positive = Self::count(&lowered, &self.keywords.positive);
        let negative = Self::count(&lowered, &self.keywords.negative);
        let sentiment = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        };
        tracing::debug!(positive, negative, ?sentiment, "Classified feedback");
        sentiment
    }
}
