/// Per-client interaction state and its transitions.
///
/// `NoSelection -> Filtered -> SchemeSelected`. Every transition replaces the fields it
/// touches wholesale; an advisory failure leaves the session exactly as it was.
use std::collections::HashSet;

use advisor_common::mcp_api::SessionPhase;
use tracing::{info, warn};

use crate::advisory::{Advisor, SUMMARY_QUERY};
use crate::dataset::Dataset;
use crate::error::SessionError;
use crate::model::{Criteria, SchemeRecord};

pub const NO_MATCH_WARNING: &str =
    "No schemes found matching your criteria. Please try adjusting your inputs.";
pub const NO_SELECTION_WARNING: &str = "Please select a scheme before asking questions.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    NoMatch,
    Found(usize),
}

impl FilterOutcome {
    pub fn message(&self) -> String {
        match self {
            FilterOutcome::NoMatch => NO_MATCH_WARNING.to_string(),
            FilterOutcome::Found(n) => format!("Found {n} matching schemes!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    Answer(String),
    NoSelection,
}

#[derive(Debug, Default)]
pub struct Session {
    results: Option<Vec<SchemeRecord>>,
    selected: Option<SchemeRecord>,
    summary: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.selected.is_some() {
            SessionPhase::SchemeSelected
        } else if self.results.as_ref().is_some_and(|r| !r.is_empty()) {
            SessionPhase::Filtered
        } else {
            SessionPhase::NoSelection
        }
    }

    pub fn results(&self) -> &[SchemeRecord] {
        self.results.as_deref().unwrap_or_default()
    }

    pub fn selected(&self) -> Option<&SchemeRecord> {
        self.selected.as_ref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Distinct scheme names of the current results, first occurrence order.
    pub fn scheme_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.results()
            .iter()
            .filter(|r| seen.insert(r.name.as_str()))
            .map(|r| r.name.clone())
            .collect()
    }

    /// Filter the dataset, replacing results and clearing any selection.
    pub fn submit(&mut self, dataset: &Dataset, criteria: &Criteria) -> FilterOutcome {
        let results: Vec<SchemeRecord> = dataset.filter(criteria).into_iter().cloned().collect();
        let found = results.len();

        self.results = Some(results);
        self.selected = None;
        self.summary = None;

        if found == 0 {
            warn!(?criteria, "no schemes matched");
            FilterOutcome::NoMatch
        } else {
            info!(found, "schemes matched");
            FilterOutcome::Found(found)
        }
    }

    /// Select a scheme from the current results and summarize it.
    ///
    /// Issues exactly one advisory call, with the scheme's details as context.
    pub async fn select<A: Advisor>(
        &mut self,
        scheme_name: &str,
        advisor: &A,
    ) -> Result<&SchemeRecord, SessionError> {
        let results = match &self.results {
            Some(results) if !results.is_empty() => results,
            _ => return Err(SessionError::NotFiltered),
        };
        let record = results
            .iter()
            .find(|r| r.name == scheme_name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownScheme(scheme_name.to_string()))?;

        let summary = advisor.ask(SUMMARY_QUERY, &record.details).await?;
        info!(scheme = %record.name, "scheme selected and summarized");

        self.summary = Some(summary);
        Ok(self.selected.insert(record))
    }

    /// Ask a question about the selected scheme. Without a selection no call is made.
    pub async fn ask<A: Advisor>(
        &self,
        question: &str,
        advisor: &A,
    ) -> Result<AskOutcome, SessionError> {
        let Some(record) = &self.selected else {
            warn!("question submitted with no scheme selected");
            return Ok(AskOutcome::NoSelection);
        };

        let answer = advisor.ask(question, &record.details).await?;
        Ok(AskOutcome::Answer(answer))
    }
}
