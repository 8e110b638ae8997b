//! Search workflow state and the deferred search scheduler.

pub mod scheduler;
mod workflow;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{catalog::Catalog, filter::FilterCriteria, models::GameRecord};

pub use scheduler::{SearchEvent, SearchHandle, SearchScheduler};
pub use workflow::{SearchPhase, SearchWorkflow};

/// Sequence number assigned to each search submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(pub u64);

impl fmt::Display for SearchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How completions of overlapping submissions are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Every completion is applied; whichever finishes last is displayed.
    #[default]
    LastCompletedWins,
    /// Completions older than the newest submission are discarded.
    LatestSubmissionWins,
}

/// Outcome of one search: the criteria that were submitted and the
/// catalog positions that matched them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    criteria: FilterCriteria,
    indices: Vec<usize>,
}

impl ResultSet {
    /// Wrap matched catalog positions.
    pub fn new(criteria: FilterCriteria, indices: Vec<usize>) -> Self {
        Self { criteria, indices }
    }

    /// Criteria this result was computed for.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Matched catalog positions, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of matched records.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Resolve the matched records against the catalog they were computed from.
    pub fn records<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a GameRecord> + 'a {
        self.indices.iter().filter_map(move |idx| catalog.get(*idx))
    }
}
