//! Rate fetch state: the loading flag, the last error and the current rate.
//!
//! A fetch is split in two halves so the I/O can run elsewhere:
//! [`RateFetcher::start`] hands out a [`FetchTicket`] and
//! [`RateFetcher::finish`] applies the outcome. Only the most recently
//! started ticket is applied; completions of superseded tickets are dropped.

use super::currency::{CurrencyCode, CurrencyRateProvider};
use super::error::FetchError;
use tracing::{debug, instrument, warn};

/// Rate value meaning "no valid rate available".
pub const NO_RATE: f64 = 0.0;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Loading,
    /// Holds [`NO_RATE`] when no fetch has succeeded or a failure was dismissed.
    Ready(f64),
    Failed(String),
}

/// Handle of a started fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub sequence: u64,
    pub base: CurrencyCode,
    pub target: CurrencyCode,
}

#[derive(Debug, Default)]
pub struct RateFetcher {
    rate: f64,
    loading: bool,
    error: Option<String>,
    latest: u64,
}

impl RateFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state(&self) -> FetchState {
        if self.loading {
            FetchState::Loading
        } else if let Some(error) = &self.error {
            FetchState::Failed(error.clone())
        } else {
            FetchState::Ready(self.rate)
        }
    }

    /// Marks a new fetch for `base`/`target` as in flight.
    pub fn start(&mut self, base: &CurrencyCode, target: &CurrencyCode) -> FetchTicket {
        self.latest += 1;
        self.loading = true;
        self.error = None;
        debug!(sequence = self.latest, %base, %target, "Starting rate fetch");
        FetchTicket {
            sequence: self.latest,
            base: base.clone(),
            target: target.clone(),
        }
    }

    /// Applies the outcome of `ticket`. Returns `false` if a newer fetch has
    /// been started since, in which case nothing changes.
    pub fn finish(&mut self, ticket: &FetchTicket, result: Result<f64, FetchError>) -> bool {
        if ticket.sequence != self.latest {
            warn!(
                sequence = ticket.sequence,
                latest = self.latest,
                "Discarding stale rate fetch result"
            );
            return false;
        }

        match result {
            Ok(rate) => {
                debug!(
                    "Conversion rate from {} to {}: {}",
                    ticket.base, ticket.target, rate
                );
                self.rate = rate;
            }
            Err(e) => {
                warn!(error = %e, base = %ticket.base, target = %ticket.target, "Rate fetch failed");
                self.error = Some(e.to_string());
                self.rate = NO_RATE;
            }
        }
        self.loading = false;
        true
    }

    /// Fetches and applies a rate in one step.
    #[instrument(name = "RateFetch", skip_all, fields(base = %base, target = %target))]
    pub async fn fetch(
        &mut self,
        provider: &dyn CurrencyRateProvider,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> FetchState {
        let ticket = self.start(base, target);
        let result = provider.get_rate(&ticket.base, &ticket.target).await;
        self.finish(&ticket, result);
        self.state()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
