//! Errors.

use thiserror::Error;

use crate::queue::Resource;

/// An error raised while validating or running the model.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ModelError {
    /// The queue for a resource has no steady state.
    ///
    /// Happens when arrivals outpace the combined service capacity, i.e. `ρ >= 1`.
    #[error("Model unstable: {resource} utilisation is {rho:.3}, must be below 1")]
    Unstable {
        /// The resource whose queue grows without bound.
        resource: Resource,
        /// The offending utilisation.
        rho: f64,
    },

    /// A rate was negative, zero where it must be positive, or not finite.
    #[error("Invalid {name} for {resource}: {value}")]
    InvalidRate {
        /// The resource the rate belongs to.
        resource: Resource,
        /// Which rate, e.g. "arrival rate".
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A resource was configured with zero servers.
    #[error("{resource} needs at least one channel")]
    NoChannels {
        /// The resource with no servers.
        resource: Resource,
    },

    /// A sampling distribution had invalid parameters.
    #[error("Invalid {stream} distribution: {reason}")]
    InvalidDistribution {
        /// The sample stream being configured.
        stream: &'static str,
        /// Why the parameters were rejected.
        reason: String,
    },

    /// Some other configuration value was out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The ledger ran out of arrival events before reaching its guest cutoff.
    #[error("Ran out of samples after assigning {assigned} of {cutoff} guests")]
    SamplesExhausted {
        /// Guests assigned before the samples ran out.
        assigned: usize,
        /// The configured cutoff.
        cutoff: usize,
    },

    /// A statistic was requested from a stream with no draws.
    #[error("No draws in the {0} sample")]
    EmptySample(&'static str),
}

/// Result type for model operations.
pub type ModelResult<T> = std::result::Result<T, ModelError>;
