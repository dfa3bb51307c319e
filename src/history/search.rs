//! Querying recorded history.
//!
//! [`HistoryQuery`] combines a free-text term with method and outcome
//! constraints. The free functions below are shorthands for the common
//! single-criterion queries.

use super::models::{HistoryEntry, HistoryOutcome};
use crate::models::{HttpMethod, RequestBody};

/// Which outcomes a query accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutcomeFilter {
    #[default]
    Any,
    Succeeded,
    Failed,
    /// Responses with this status, and failures carrying it.
    Status(u16),
}

/// A composable history query. Every criterion left unset matches all
/// entries.
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    text: Option<String>,
    method: Option<HttpMethod>,
    outcome: OutcomeFilter,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive term matched against the URL, method, request body
    /// and response body (or error message). Blank terms are ignored.
    pub fn text(mut self, term: &str) -> Self {
        let term = term.trim();
        self.text = (!term.is_empty()).then(|| term.to_lowercase());
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn outcome(mut self, outcome: OutcomeFilter) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        if self.method.is_some_and(|m| m != entry.request.method) {
            return false;
        }

        let outcome_ok = match (self.outcome, &entry.outcome) {
            (OutcomeFilter::Any, _) => true,
            (OutcomeFilter::Succeeded, outcome) => {
                matches!(outcome, HistoryOutcome::Success { .. })
            }
            (OutcomeFilter::Failed, outcome) => matches!(outcome, HistoryOutcome::Error { .. }),
            (OutcomeFilter::Status(code), HistoryOutcome::Success { response }) => {
                response.status == code
            }
            (OutcomeFilter::Status(code), HistoryOutcome::Error { error }) => {
                error.status() == Some(code)
            }
        };
        if !outcome_ok {
            return false;
        }

        match &self.text {
            Some(term) => searchable_text(entry).any(|field| field.to_lowercase().contains(term)),
            None => true,
        }
    }

    /// Returns the matching entries in their original order.
    pub fn run<'a>(&self, entries: &'a [HistoryEntry]) -> Vec<&'a HistoryEntry> {
        entries.iter().filter(|entry| self.matches(entry)).collect()
    }
}

fn searchable_text(entry: &HistoryEntry) -> impl Iterator<Item = String> + '_ {
    let body = match &entry.request.body {
        Some(RequestBody::Text(text)) | Some(RequestBody::Xml(text)) => Some(text.clone()),
        Some(RequestBody::Json(value)) => Some(value.to_string()),
        _ => None,
    };
    let result = match &entry.outcome {
        HistoryOutcome::Success { response } => response.body_text(),
        HistoryOutcome::Error { error } => error.message.clone(),
    };

    [
        Some(entry.request.url.clone()),
        Some(entry.request.method.to_string()),
        body,
        Some(result),
    ]
    .into_iter()
    .flatten()
}

/// Entries whose URL, method, bodies or error message contain `query`,
/// ignoring case. A blank query matches everything.
pub fn search_history<'a>(query: &str, entries: &'a [HistoryEntry]) -> Vec<&'a HistoryEntry> {
    HistoryQuery::new().text(query).run(entries)
}

/// Entries sent with `method`. Unknown method names match nothing.
pub fn filter_by_method<'a>(method: &str, entries: &'a [HistoryEntry]) -> Vec<&'a HistoryEntry> {
    match HttpMethod::from_str(method) {
        Some(method) => HistoryQuery::new().method(method).run(entries),
        None => Vec::new(),
    }
}

pub fn filter_by_status(status: u16, entries: &[HistoryEntry]) -> Vec<&HistoryEntry> {
    HistoryQuery::new()
        .outcome(OutcomeFilter::Status(status))
        .run(entries)
}

pub fn filter_successful(entries: &[HistoryEntry]) -> Vec<&HistoryEntry> {
    HistoryQuery::new()
        .outcome(OutcomeFilter::Succeeded)
        .run(entries)
}

pub fn filter_errors(entries: &[HistoryEntry]) -> Vec<&HistoryEntry> {
    HistoryQuery::new().outcome(OutcomeFilter::Failed).run(entries)
}

/// Up to `count` entries, newest first.
pub fn get_recent_entries(count: usize, entries: &[HistoryEntry]) -> Vec<&HistoryEntry> {
    let mut recent: Vec<&HistoryEntry> = entries.iter().collect();
    // Stable sort keeps insertion order for equal timestamps, so reversing
    // first puts the later-recorded entry ahead.
    recent.reverse();
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent.truncate(count);
    recent
}
