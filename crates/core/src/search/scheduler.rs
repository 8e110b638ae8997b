//! Deferred execution of the filter engine.

use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use super::{ResultSet, SearchTicket};
use crate::{
    catalog::Catalog,
    filter::{matching_indices, FilterCriteria},
};

const EVENT_BUFFER: usize = 32;

/// Events emitted by scheduled searches.
#[derive(Debug)]
pub enum SearchEvent {
    /// The delay elapsed and the filter engine ran.
    Completed {
        /// Submission this result belongs to.
        ticket: SearchTicket,
        /// Matched catalog positions.
        result: ResultSet,
    },
}

/// Handle to one pending search.
#[derive(Debug)]
pub struct SearchHandle {
    ticket: SearchTicket,
    task: JoinHandle<()>,
}

impl SearchHandle {
    /// Ticket assigned at submission.
    pub fn ticket(&self) -> SearchTicket {
        self.ticket
    }

    /// Whether the task has run to completion or been aborted.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the search if it has not completed yet.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Runs each submission as its own delayed task.
///
/// Submissions are independent: nothing is coalesced, so several may be
/// pending at once and they report back in completion order.
pub struct SearchScheduler {
    catalog: Catalog,
    localized_language: Arc<str>,
    delay: Duration,
    next_ticket: u64,
    sender: mpsc::Sender<SearchEvent>,
}

impl SearchScheduler {
    /// Create a scheduler and the receiver its completions arrive on.
    pub fn new(
        catalog: Catalog,
        localized_language: impl Into<Arc<str>>,
        delay: Duration,
    ) -> (Self, mpsc::Receiver<SearchEvent>) {
        let (sender, receiver) = mpsc::channel(EVENT_BUFFER);
        let scheduler = Self {
            catalog,
            localized_language: localized_language.into(),
            delay,
            next_ticket: 1,
            sender,
        };
        (scheduler, receiver)
    }

    /// Delay applied to submissions made from now on.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay for later submissions.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Catalog searches run against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Schedule a search for `criteria`. Must be called inside a tokio runtime.
    pub fn submit(&mut self, criteria: FilterCriteria) -> SearchHandle {
        let ticket = SearchTicket(self.next_ticket);
        self.next_ticket += 1;

        let catalog = self.catalog.clone();
        let language = Arc::clone(&self.localized_language);
        let sender = self.sender.clone();
        let delay = self.delay;
        debug!(%ticket, delay_ms = delay.as_millis() as u64, ?criteria, "search scheduled");

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let indices = matching_indices(catalog.records(), &criteria, &language);
            let result = ResultSet::new(criteria, indices);
            if sender
                .send(SearchEvent::Completed { ticket, result })
                .await
                .is_err()
            {
                debug!(%ticket, "search receiver dropped; discarding result");
            }
        });

        SearchHandle { ticket, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        filter::{PlatformFilter, RatingTier},
        models::fixtures::scenario_catalog,
        search::{OverlapPolicy, SearchPhase, SearchWorkflow},
    };
    use anyhow::{anyhow, Result};
    use tokio::time::Instant;

    fn scheduler(delay_ms: u64) -> Result<(SearchScheduler, mpsc::Receiver<SearchEvent>)> {
        let catalog = Catalog::from_records(scenario_catalog())?;
        Ok(SearchScheduler::new(
            catalog,
            "RUS",
            Duration::from_millis(delay_ms),
        ))
    }

    async fn next(receiver: &mut mpsc::Receiver<SearchEvent>) -> Result<(SearchTicket, ResultSet)> {
        match receiver.recv().await {
            Some(SearchEvent::Completed { ticket, result }) => Ok((ticket, result)),
            None => Err(anyhow!("search channel closed")),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn completes_after_delay() -> Result<()> {
        let (mut scheduler, mut receiver) = scheduler(1000)?;
        let started = Instant::now();
        let handle = scheduler.submit(FilterCriteria::default());
        assert_eq!(handle.ticket(), SearchTicket(1));

        let (ticket, result) = next(&mut receiver).await?;
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(ticket, SearchTicket(1));
        assert_eq!(result.indices(), &[0]);
        assert_eq!(result.criteria(), &FilterCriteria::default());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn tickets_increase_per_submission() -> Result<()> {
        let (mut scheduler, _receiver) = scheduler(10)?;
        let first = scheduler.submit(FilterCriteria::default());
        let second = scheduler.submit(FilterCriteria::default());
        assert!(first.ticket() < second.ticket());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_submissions_report_in_completion_order() -> Result<()> {
        let (mut scheduler, mut receiver) = scheduler(1000)?;
        let slow = scheduler.submit(FilterCriteria::default());
        scheduler.set_delay(Duration::from_millis(100));
        let fast = scheduler.submit(FilterCriteria {
            rating: RatingTier::Lowest,
            ..FilterCriteria::default()
        });

        let mut workflow = SearchWorkflow::default();
        workflow.begin_search(slow.ticket());
        workflow.begin_search(fast.ticket());

        let (ticket, result) = next(&mut receiver).await?;
        assert_eq!(ticket, fast.ticket());
        workflow.complete(ticket, result);
        assert_eq!(workflow.phase(), SearchPhase::Displaying);

        let (ticket, result) = next(&mut receiver).await?;
        assert_eq!(ticket, slow.ticket());
        workflow.complete(ticket, result);
        assert_eq!(workflow.result().map(ResultSet::indices), Some(&[0][..]));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn latest_submission_policy_keeps_newest_result() -> Result<()> {
        let (mut scheduler, mut receiver) = scheduler(1000)?;
        let slow = scheduler.submit(FilterCriteria::default());
        scheduler.set_delay(Duration::from_millis(100));
        let fast = scheduler.submit(FilterCriteria {
            rating: RatingTier::Lowest,
            ..FilterCriteria::default()
        });

        let mut workflow = SearchWorkflow::new(OverlapPolicy::LatestSubmissionWins);
        workflow.begin_search(slow.ticket());
        workflow.begin_search(fast.ticket());

        for _ in 0..2 {
            let (ticket, result) = next(&mut receiver).await?;
            workflow.complete(ticket, result);
        }
        assert_eq!(workflow.latest_applied(), Some(fast.ticket()));
        assert_eq!(workflow.result().map(ResultSet::indices), Some(&[1][..]));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn empty_match_is_reported_not_failed() -> Result<()> {
        let (mut scheduler, mut receiver) = scheduler(50)?;
        scheduler.submit(FilterCriteria {
            platform: PlatformFilter::PlayStation,
            ..FilterCriteria::default()
        });
        let (_, result) = next(&mut receiver).await?;
        assert!(result.is_empty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_search_never_reports() -> Result<()> {
        let (mut scheduler, mut receiver) = scheduler(1000)?;
        let handle = scheduler.submit(FilterCriteria::default());
        handle.abort();
        drop(scheduler);
        assert!(receiver.recv().await.is_none());
        assert!(handle.is_finished());
        Ok(())
    }
}
