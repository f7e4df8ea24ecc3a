//! Consent and privacy policy analysis: risk-flag extraction, scoring, and the
//! HTTP surface that composes them.

pub mod analysis;
pub mod config;
pub mod error;
pub mod telemetry;
