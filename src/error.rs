//!
//! Defines error types for the rail card.
//!
//! Only configuration problems are surfaced to the host. Lookup misses never
//! produce an error, and registry failures are absorbed by the loading gate.

/// Errors raised by the external registry service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The host has no registry connection to call.
    #[error("Registry service unavailable")]
    Unavailable,
    /// The registry call itself failed.
    #[error("Registry call failed: {0}")]
    Call(String),
    /// The registry answered with a payload that could not be decoded.
    #[error("Malformed registry response: {0}")]
    Malformed(String),
}

/// Represents errors that can occur while configuring or feeding the card.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    /// Neither a device prefix nor a registry device id was configured.
    #[error("You must define a device")]
    MissingDevice,
    /// The configuration payload could not be decoded.
    #[error("Invalid card configuration: {0}")]
    InvalidConfig(String),
    /// The host state payload could not be decoded.
    #[error("Invalid state snapshot: {0}")]
    InvalidSnapshot(String),
}
