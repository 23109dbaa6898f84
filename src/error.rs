//! Error types for the wheel and its checkout contract

use thiserror::Error;

/// Reasons a spin cannot start
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpinError {
    /// Gate is locked or a spin is already in progress
    #[error("Spin rejected: gate is closed")]
    GateClosed,

    /// Fewer outcomes than a spin needs; regenerate the outcome set
    #[error("Not enough outcomes to spin: have {count}, need at least 2")]
    InsufficientOutcomes { count: usize },
}

/// Outcome set generation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutcomeError {
    /// Generation bounds are inverted
    #[error("Invalid outcome config: {reason}")]
    InvalidOutcomeConfig { reason: String },

    /// The outcome set is frozen while a spin is live
    #[error("Cannot regenerate outcomes while a spin is in progress")]
    RoundInProgress,

    /// A curated list was empty
    #[error("Outcome label list is empty")]
    EmptyLabels,
}

/// Checkout request failures, mapped to HTTP-style status codes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    /// Only POST is accepted
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Missing, non-numeric or below-minimum amount
    #[error("Invalid amount")]
    InvalidAmount,

    /// Payment provider reported an error
    #[error("{0}")]
    Provider(String),
}

impl CheckoutError {
    /// Status code the checkout endpoint responds with
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::MethodNotAllowed => 405,
            CheckoutError::InvalidAmount => 400,
            CheckoutError::Provider(_) => 500,
        }
    }
}
