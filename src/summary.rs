//! Trip summary rendering
//!
//! Renders the five collected answers as a bullet list, relabels the trip
//! type, and appends either the recommendation text or an inline failure
//! notice. Rendering never fails: a degraded summary beats a failed turn.

use crate::prompts::SummaryText;
use crate::recommendation::{RecommendationError, TripDetails};
use crate::state_machine::state::{Answers, QuestionKey};
use serde::{Deserialize, Serialize};

const REASON_PLACEHOLDER: &str = "{reason}";

/// One selectable trip type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripTypeOption {
    /// Numeric code offered in the question ("1", "2", "3")
    pub code: String,
    /// Display label used in the summary and the recommendation request
    pub label: String,
    /// Lower-case fragments that identify the option in free text
    pub keywords: Vec<String>,
}

/// Maps raw trip-type answers to display labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripTypeCatalog {
    pub options: Vec<TripTypeOption>,
}

impl TripTypeCatalog {
    pub fn english() -> Self {
        Self {
            options: vec![
                option("1", "independent trip", &["independent"]),
                option("2", "organized tourism", &["organized", "organised", "tour operator"]),
                option("3", "business trip", &["business"]),
            ],
        }
    }

    pub fn russian() -> Self {
        Self {
            options: vec![
                option("1", "Самостоятельная поездка", &["самостоятельн"]),
                option(
                    "2",
                    "Организованный туризм с использованием услуг туроператора",
                    &["организован", "туроператор"],
                ),
                option("3", "Командировка", &["делов", "командиров"]),
            ],
        }
    }

    /// Display label for a raw answer; unrecognized answers pass through verbatim.
    ///
    /// An exact code match wins over keyword containment.
    pub fn display_label<'a>(&'a self, raw: &'a str) -> &'a str {
        let trimmed = raw.trim();
        if let Some(found) = self.options.iter().find(|o| o.code == trimmed) {
            return &found.label;
        }
        let lowered = trimmed.to_lowercase();
        self.options
            .iter()
            .find(|o| {
                o.keywords
                    .iter()
                    .any(|kw| !kw.is_empty() && lowered.contains(&kw.to_lowercase()))
            })
            .map_or(raw, |o| o.label.as_str())
    }
}

fn option(code: &str, label: &str, keywords: &[&str]) -> TripTypeOption {
    TripTypeOption {
        code: code.to_string(),
        label: label.to_string(),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
    }
}

/// Trip attributes as sent to the recommendation client
pub fn trip_details(answers: &Answers, catalog: &TripTypeCatalog, text: &SummaryText) -> TripDetails {
    let field = |key| {
        answers
            .get(key)
            .unwrap_or(text.not_specified.as_str())
            .to_string()
    };
    TripDetails {
        trip_type: answers
            .get(QuestionKey::TripType)
            .map_or_else(|| text.not_specified.clone(), |raw| catalog.display_label(raw).to_string()),
        destination: field(QuestionKey::Destination),
        group_size: field(QuestionKey::GroupSize),
        travel_dates: field(QuestionKey::TravelDates),
        departure_city: field(QuestionKey::DepartureCity),
    }
}

/// Render the attribute list
pub fn render_details(details: &TripDetails, text: &SummaryText) -> String {
    let labels = &text.labels;
    let rows = [
        (&labels.trip_type, &details.trip_type),
        (&labels.destination, &details.destination),
        (&labels.group_size, &details.group_size),
        (&labels.travel_dates, &details.travel_dates),
        (&labels.departure_city, &details.departure_city),
    ];

    let mut out = String::new();
    out.push_str(&text.header);
    out.push_str("\n\n");
    for (label, value) in rows {
        out.push_str("• ");
        out.push_str(label);
        out.push_str(": ");
        out.push_str(value.trim());
        out.push('\n');
    }
    out
}

/// Full summary: attribute list, recommendation block, footer
pub fn build_summary(
    answers: &Answers,
    catalog: &TripTypeCatalog,
    text: &SummaryText,
    recommendation: &Result<String, RecommendationError>,
) -> String {
    let details = trip_details(answers, catalog, text);
    let mut out = render_details(&details, text);
    out.push('\n');

    match recommendation {
        Ok(body) if !body.trim().is_empty() => {
            out.push_str(&text.recommendation_heading);
            out.push('\n');
            out.push_str(body.trim());
        }
        Ok(_) => {
            let reason = RecommendationError::Unavailable("empty response".to_string());
            out.push_str(&failure_notice(text, &reason));
        }
        Err(e) => out.push_str(&failure_notice(text, e)),
    }

    out.push_str("\n\n");
    out.push_str(&text.footer);
    out
}

fn failure_notice(text: &SummaryText, error: &RecommendationError) -> String {
    text.recommendation_failure
        .replace(REASON_PLACEHOLDER, &error.to_string())
}
