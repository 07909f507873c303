//! Front-end state for one weather search box.
//!
//! [`WeatherView`] owns the input text, the displayed report and the inline
//! error. A query moves it `Idle -> Loading -> (Success | Error)` and any
//! terminal phase can start over. Rendering is left to the caller; the
//! terminal front end in `src/bin/cityweather-cli.rs` is one.
//!
//! Rules enforced here:
//! - blank input never reaches the network, it only sets an inline message;
//! - the trigger is disabled while a query is loading;
//! - every query gets a sequence number and only the latest one may update
//!   the view, so a response that arrives after [`WeatherView::cancel`] or
//!   after a newer query started is dropped.

use thiserror::Error;
use tracing::debug;

use crate::client::{FetchError, WeatherFetcher};
use crate::models::WeatherReport;

/// Inline message for a blank query.
pub const EMPTY_QUERY_MESSAGE: &str = "Enter a city name to get started";

/// How a query was started. Both are equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Button,
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// A query was not started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Enter a city name to get started")]
    EmptyQuery,

    #[error("a query is already in flight")]
    Busy,
}

/// Handle for one started query; hand it back to [`WeatherView::complete`].
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    city: String,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Trimmed city to send to the fetcher.
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug, Default)]
pub struct WeatherView {
    input: String,
    report: Option<WeatherReport>,
    error: Option<String>,
    loading: bool,
    last_seq: u64,
}

impl WeatherView {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The search trigger (button or Enter) is usable.
    pub fn trigger_enabled(&self) -> bool {
        !self.loading
    }

    pub fn phase(&self) -> Phase {
        // ---
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.report.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    /// Start a query for the current input.
    ///
    /// Blank input sets [`EMPTY_QUERY_MESSAGE`] and leaves any displayed
    /// report alone. Otherwise the view enters Loading with error and report
    /// cleared.
    pub fn submit(&mut self, trigger: Trigger) -> Result<Ticket, SubmitError> {
        // ---
        if self.loading {
            debug!("Ignoring {:?} trigger while loading", trigger);
            return Err(SubmitError::Busy);
        }

        let city = self.input.trim();
        if city.is_empty() {
            self.error = Some(EMPTY_QUERY_MESSAGE.to_string());
            return Err(SubmitError::EmptyQuery);
        }

        self.last_seq += 1;
        self.loading = true;
        self.error = None;
        self.report = None;

        debug!("Query #{} for {:?} via {:?}", self.last_seq, city, trigger);
        Ok(Ticket {
            seq: self.last_seq,
            city: city.to_string(),
        })
    }

    /// Apply the outcome of `ticket`'s query.
    ///
    /// Returns `false` and leaves the view untouched when the ticket is no
    /// longer the latest one.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<WeatherReport, FetchError>,
    ) -> bool {
        // ---
        if ticket.seq != self.last_seq || !self.loading {
            debug!(
                "Dropping stale result for query #{} (latest #{})",
                ticket.seq, self.last_seq
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(report) => {
                self.report = Some(report);
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.user_message());
                self.report = None;
            }
        }
        true
    }

    /// Abandon the in-flight query, if any. Its result will be dropped.
    pub fn cancel(&mut self) {
        // ---
        if self.loading {
            debug!("Cancelling query #{}", self.last_seq);
            self.loading = false;
            self.last_seq += 1;
        }
    }

    /// Submit, fetch and apply in one step.
    pub async fn search(
        &mut self,
        trigger: Trigger,
        fetcher: &WeatherFetcher,
    ) -> Result<(), SubmitError> {
        // ---
        let ticket = self.submit(trigger)?;
        let outcome = fetcher.fetch(ticket.city()).await;
        self.complete(ticket, outcome);
        Ok(())
    }
}
