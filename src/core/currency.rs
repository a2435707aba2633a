//! Currency codes, the selectable catalogue and the rate provider abstraction

use super::error::FetchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Short currency identifier such as `USD`.
///
/// Any trimmed, uppercased string is accepted, including the empty one.
/// Front ends check [`is_known`](CurrencyCode::is_known) before selecting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Self {
        CurrencyCode(code.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_known(&self) -> bool {
        label_for(self).is_some()
    }
}

impl From<String> for CurrencyCode {
    fn from(value: String) -> Self {
        CurrencyCode::new(&value)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        CurrencyCode::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currencies offered for selection, with their display labels.
pub const CURRENCIES: &[(&str, &str)] = &[
    ("AUD", "Australian Dollar"),
    ("BRL", "Brazilian Real"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("CZK", "Czech Koruna"),
    ("DKK", "Danish Krone"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("HKD", "Hong Kong Dollar"),
    ("INR", "Indian Rupee"),
    ("JPY", "Japanese Yen"),
    ("KRW", "South Korean Won"),
    ("KZT", "Kazakhstani Tenge"),
    ("MXN", "Mexican Peso"),
    ("NOK", "Norwegian Krone"),
    ("PLN", "Polish Zloty"),
    ("RUB", "Russian Ruble"),
    ("SEK", "Swedish Krona"),
    ("SGD", "Singapore Dollar"),
    ("TRY", "Turkish Lira"),
    ("UAH", "Ukrainian Hryvnia"),
    ("USD", "US Dollar"),
    ("ZAR", "South African Rand"),
];

pub fn label_for(code: &CurrencyCode) -> Option<&'static str> {
    CURRENCIES
        .iter()
        .find(|(c, _)| *c == code.as_str())
        .map(|(_, label)| *label)
}

/// Looks a currency up by code or by label, ignoring case.
///
/// A label matches when it equals the query or when it is the only label
/// containing it, so `euro` and `yen` select `EUR` and `JPY` while
/// `dollar` is ambiguous.
pub fn find_currency(query: &str) -> Option<CurrencyCode> {
    let code = CurrencyCode::new(query);
    if code.is_known() {
        return Some(code);
    }

    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Some((c, _)) = CURRENCIES
        .iter()
        .find(|(_, label)| label.to_lowercase() == needle)
    {
        return Some(CurrencyCode::new(c));
    }

    let mut matches = CURRENCIES
        .iter()
        .filter(|(_, label)| label.to_lowercase().contains(&needle));
    match (matches.next(), matches.next()) {
        (Some((c, _)), None) => Some(CurrencyCode::new(c)),
        _ => None,
    }
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Returns the multiplier converting one unit of `from` into `to`.
    async fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_normalised() {
        let code = CurrencyCode::new(" usd ");
        assert_eq!(code.as_str(), "USD");
        assert!(code.is_known());
        assert_eq!(label_for(&code), Some("US Dollar"));
    }

    #[test]
    fn test_unknown_and_empty_codes() {
        assert!(!CurrencyCode::new("XYZ").is_known());
        let empty = CurrencyCode::new("");
        assert!(empty.is_empty());
        assert!(!empty.is_known());
    }

    #[test]
    fn test_find_currency_by_code_or_label() {
        assert_eq!(find_currency("gbp"), Some(CurrencyCode::new("GBP")));
        assert_eq!(find_currency("Euro"), Some(CurrencyCode::new("EUR")));
        assert_eq!(find_currency(" us dollar "), Some(CurrencyCode::new("USD")));
        assert_eq!(find_currency("yen"), Some(CurrencyCode::new("JPY")));
    }

    #[test]
    fn test_find_currency_rejects_ambiguous_and_unknown() {
        assert_eq!(find_currency("dollar"), None);
        assert_eq!(find_currency("XYZ"), None);
        assert_eq!(find_currency(""), None);
        assert_eq!(find_currency("   "), None);
    }

    #[test]
    fn test_catalogue_is_sorted_and_unique() {
        let codes: Vec<&str> = CURRENCIES.iter().map(|(c, _)| *c).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_code_deserializes_from_yaml_string() {
        let code: CurrencyCode = serde_yaml::from_str("eur").unwrap();
        assert_eq!(code, CurrencyCode::new("EUR"));
    }
}
