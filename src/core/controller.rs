//! Two-field currency converter state.
//!
//! The controller owns the selected currency pair and both amount fields,
//! and keeps the dependent field in sync on three triggers: an edit of the
//! base field, an edit of the target field, and the arrival of a new rate.

use super::amount::AmountField;
use super::config::Defaults;
use super::currency::{CurrencyCode, CurrencyRateProvider};
use super::error::FetchError;
use super::fetcher::{FetchState, FetchTicket, RateFetcher};
use tracing::debug;

/// Inputs the rate reaction depends on.
#[derive(Debug, Clone, PartialEq)]
struct Tracked {
    rate: f64,
    base_amount: AmountField,
    base_code: CurrencyCode,
    target_code: CurrencyCode,
}

#[derive(Debug)]
pub struct ConversionController {
    base_code: CurrencyCode,
    target_code: CurrencyCode,
    base_amount: AmountField,
    target_amount: AmountField,
    fetcher: RateFetcher,
    defaults: Defaults,
    requested: Option<(CurrencyCode, CurrencyCode)>,
    last_reaction: Option<Tracked>,
}

impl ConversionController {
    pub fn new(defaults: Defaults) -> Self {
        ConversionController {
            base_code: defaults.base_code.clone(),
            target_code: defaults.target_code.clone(),
            base_amount: defaults.base_amount.into(),
            target_amount: defaults.target_amount.into(),
            fetcher: RateFetcher::new(),
            defaults,
            requested: None,
            last_reaction: None,
        }
    }

    pub fn base_code(&self) -> &CurrencyCode {
        &self.base_code
    }

    pub fn target_code(&self) -> &CurrencyCode {
        &self.target_code
    }

    pub fn base_amount(&self) -> AmountField {
        self.base_amount
    }

    pub fn target_amount(&self) -> AmountField {
        self.target_amount
    }

    pub fn rate(&self) -> f64 {
        self.fetcher.rate()
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.fetcher.error()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetcher.state()
    }

    pub fn fixed_decimals(&self) -> u32 {
        self.defaults.fixed_decimals
    }

    pub fn edit_base_amount(&mut self, raw: &str) {
        let Some(value) = AmountField::parse(raw) else {
            debug!(input = raw, "Ignoring non-numeric base amount");
            return;
        };

        self.base_amount = value;
        let rate = self.rate();
        self.target_amount = match value.value() {
            Some(base) if rate > 0.0 => {
                let target = AmountField::derived(base * rate, self.defaults.fixed_decimals);
                debug!(
                    "Converting {} {} to {} {} (rate: {})",
                    base, self.base_code, target, self.target_code, rate
                );
                target
            }
            _ => AmountField::Empty,
        };
        self.remember_inputs();
    }

    pub fn edit_target_amount(&mut self, raw: &str) {
        let Some(value) = AmountField::parse(raw) else {
            debug!(input = raw, "Ignoring non-numeric target amount");
            return;
        };

        self.target_amount = value;
        let rate = self.rate();
        self.base_amount = match value.value() {
            Some(target) if rate > 0.0 => {
                let base = AmountField::derived(target / rate, self.defaults.fixed_decimals);
                debug!(
                    "Converting {} {} to {} {} (rate: {})",
                    target, self.target_code, base, self.base_code, rate
                );
                base
            }
            _ => AmountField::Empty,
        };
        // The base amount changed, so the reaction recomputes the target
        // from the rounded base.
        self.on_rate_change();
    }

    pub fn select_base_code(&mut self, code: CurrencyCode) {
        self.reset_amounts();
        self.base_code = code;
        self.react_to_reset();
    }

    pub fn select_target_code(&mut self, code: CurrencyCode) {
        self.reset_amounts();
        self.target_code = code;
        self.react_to_reset();
    }

    pub fn clear_error(&mut self) {
        self.fetcher.clear_error();
    }

    /// Starts a fetch if the current pair has not been requested yet.
    pub fn next_fetch(&mut self) -> Option<FetchTicket> {
        let pair = (self.base_code.clone(), self.target_code.clone());
        if self.requested.as_ref() == Some(&pair) {
            return None;
        }
        let ticket = self.fetcher.start(&pair.0, &pair.1);
        self.requested = Some(pair);
        Some(ticket)
    }

    /// Applies a fetch outcome and recomputes the target field if needed.
    /// Returns `false` when the ticket was superseded.
    pub fn apply_fetch(&mut self, ticket: &FetchTicket, result: Result<f64, FetchError>) -> bool {
        let applied = self.fetcher.finish(ticket, result);
        if applied {
            self.on_rate_change();
        }
        applied
    }

    /// Fetches the rate for the current pair, if needed, and applies it.
    pub async fn refresh(&mut self, provider: &dyn CurrencyRateProvider) -> FetchState {
        if let Some(ticket) = self.next_fetch() {
            let result = provider.get_rate(&ticket.base, &ticket.target).await;
            self.apply_fetch(&ticket, result);
        }
        self.fetch_state()
    }

    /// Recomputes the target from the base amount when the rate, the base
    /// amount or either code changed since the last reaction.
    ///
    /// Skipped while a fetch is in flight, without a base amount, or
    /// without a valid rate.
    pub fn on_rate_change(&mut self) {
        let tracked = self.tracked();
        if self.last_reaction.as_ref() == Some(&tracked) {
            return;
        }
        if self.is_loading() {
            return;
        }
        self.last_reaction = Some(tracked);

        let rate = self.rate();
        if let (Some(base), true) = (self.base_amount.value(), rate > 0.0) {
            let target = AmountField::derived(base * rate, self.defaults.fixed_decimals);
            self.target_amount = target;
            debug!(
                "Conversion rate updated: {} {} = {} {}",
                base, self.base_code, target, self.target_code
            );
        }
    }

    /// A new pair waits for its own rate; reselecting the current pair
    /// recomputes the reset target from the rate already known.
    fn react_to_reset(&mut self) {
        let current = (self.base_code.clone(), self.target_code.clone());
        if self.requested.as_ref() == Some(&current) {
            self.last_reaction = None;
            self.on_rate_change();
        }
    }

    fn reset_amounts(&mut self) {
        self.base_amount = self.defaults.base_amount.into();
        self.target_amount = self.defaults.target_amount.into();
    }

    fn tracked(&self) -> Tracked {
        Tracked {
            rate: self.rate(),
            base_amount: self.base_amount,
            base_code: self.base_code.clone(),
            target_code: self.target_code.clone(),
        }
    }

    fn remember_inputs(&mut self) {
        self.last_reaction = Some(self.tracked());
    }
}
