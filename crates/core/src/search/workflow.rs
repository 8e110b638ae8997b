use tracing::{debug, info};

use super::{OverlapPolicy, ResultSet, SearchTicket};
use crate::filter::FilterCriteria;

/// Where the view is in the submit / wait / display cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing has been searched yet.
    Idle,
    /// A submission is waiting out its delay.
    Searching,
    /// A result is available.
    Displaying,
}

/// View state: the criteria being edited, the current phase and the last
/// applied result.
///
/// Editing criteria never recomputes anything; the displayed result stays
/// as it was until the next completion arrives.
#[derive(Debug, Clone)]
pub struct SearchWorkflow {
    criteria: FilterCriteria,
    phase: SearchPhase,
    result: Option<ResultSet>,
    policy: OverlapPolicy,
    in_flight: usize,
    latest_submitted: Option<SearchTicket>,
    latest_applied: Option<SearchTicket>,
}

impl Default for SearchWorkflow {
    fn default() -> Self {
        Self::new(OverlapPolicy::default())
    }
}

impl SearchWorkflow {
    /// Fresh workflow in the [`SearchPhase::Idle`] phase with default criteria.
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            phase: SearchPhase::Idle,
            result: None,
            policy,
            in_flight: 0,
            latest_submitted: None,
            latest_applied: None,
        }
    }

    /// Criteria currently selected in the form.
    pub fn criteria(&self) -> FilterCriteria {
        self.criteria
    }

    /// Mutable access for form controls.
    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    /// Current phase.
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Overlap policy in effect.
    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Last applied result, `None` until the first search completes.
    pub fn result(&self) -> Option<&ResultSet> {
        self.result.as_ref()
    }

    /// Number of submissions that have neither completed nor been cancelled.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Ticket of the result currently displayed.
    pub fn latest_applied(&self) -> Option<SearchTicket> {
        self.latest_applied
    }

    /// Record a submission and enter [`SearchPhase::Searching`].
    pub fn begin_search(&mut self, ticket: SearchTicket) {
        self.in_flight += 1;
        self.latest_submitted = Some(
            self.latest_submitted
                .map_or(ticket, |latest| latest.max(ticket)),
        );
        self.phase = SearchPhase::Searching;
        debug!(%ticket, in_flight = self.in_flight, "search started");
    }

    /// Apply a finished search. Returns whether the result was taken.
    pub fn complete(&mut self, ticket: SearchTicket, result: ResultSet) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.policy == OverlapPolicy::LatestSubmissionWins
            && self.latest_submitted.is_some_and(|latest| ticket < latest)
        {
            debug!(%ticket, "discarding superseded search result");
            if self.in_flight == 0 {
                self.settle();
            }
            return false;
        }

        info!(%ticket, matches = result.len(), "search completed");
        self.result = Some(result);
        self.latest_applied = Some(ticket);
        self.phase = SearchPhase::Displaying;
        true
    }

    /// Forget a submission whose task was aborted before completing.
    pub fn cancel(&mut self, ticket: SearchTicket) {
        self.in_flight = self.in_flight.saturating_sub(1);
        debug!(%ticket, in_flight = self.in_flight, "search cancelled");
        if self.in_flight == 0 {
            self.settle();
        }
    }

    fn settle(&mut self) {
        if self.phase == SearchPhase::Searching {
            self.phase = if self.result.is_some() {
                SearchPhase::Displaying
            } else {
                SearchPhase::Idle
            };
        }
    }

    /// Whether the loading indicator should be shown.
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Searching
    }

    /// Whether the displayed result was computed for different criteria
    /// than the ones now selected.
    pub fn is_stale(&self) -> bool {
        self.result
            .as_ref()
            .is_some_and(|result| *result.criteria() != self.criteria)
    }

    /// Whether the "no results" notice should be shown.
    pub fn show_empty_notice(&self) -> bool {
        self.phase == SearchPhase::Displaying
            && self.result.as_ref().is_some_and(ResultSet::is_empty)
    }

    /// Whether the jump to top/bottom affordances should be shown.
    pub fn show_jump_controls(&self) -> bool {
        self.phase == SearchPhase::Displaying
            && self.result.as_ref().is_some_and(|result| !result.is_empty())
    }
}
