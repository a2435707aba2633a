//! Core conversion logic and abstractions

pub mod amount;
pub mod config;
pub mod controller;
pub mod currency;
pub mod error;
pub mod fetcher;
pub mod log;

// Re-export main types for cleaner imports
pub use amount::{AmountField, round_to};
pub use controller::ConversionController;
pub use currency::{CurrencyCode, CurrencyRateProvider};
pub use error::FetchError;
pub use fetcher::{FetchState, FetchTicket, RateFetcher};
