//! Failure taxonomy of a rate fetch.
//!
//! The `Display` text of each variant is the message shown to the user.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Base URL or API key absent. No request is attempted.
    #[error("API configuration is missing. Please check your configuration file or environment variables.")]
    Configuration,

    #[error("Base or target currency code is missing.")]
    MissingCode,

    #[error("Request timeout. Please try again later.")]
    Timeout,

    /// The service could not be reached at all.
    #[error("Network error. Please check your internet connection.")]
    Network,

    #[error("API error: {status} - {details}")]
    Transport { status: u16, details: String },

    /// A success status other than 200.
    #[error("API request failed with status: {0}")]
    UnexpectedStatus(u16),

    /// HTTP success, but the payload reports `result: "error"`.
    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid API response: conversion_rate not found or not a number")]
    InvalidResponse,

    #[error("{}", or_unknown(.0))]
    Other(String),
}

fn or_unknown(message: &str) -> &str {
    if message.trim().is_empty() {
        "Unknown error occurred"
    } else {
        message
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Transport {
                status: status.as_u16(),
                details: err.to_string(),
            }
        } else if err.is_connect() || err.is_request() {
            FetchError::Network
        } else {
            FetchError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Other(format!("Failed to parse API response: {err}"))
    }
}
