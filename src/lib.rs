//! Verify a hotel-operations simulation against analytic bounds.
//!
//! A hotel sells rooms to parties of guests who pass through reception, are taken to their room
//! by a porter, stay, are seen out by a porter, and leave the room to housekeeping. This crate
//! produces three independent views of one operating day, which a separate discrete-event model
//! can be checked against:
//!
//! - [`Bounds`]: closed-form best-case and worst-case revenue, with fixed expenses.
//! - [`QueueSnapshot`]: a steady-state M/M/c estimate for every resource, from seeded samples.
//! - [`GuestLedger`]: a per-guest timeline chained from the same samples.
//!
//! A [`ProfitEstimate`] built from the sampled means should land inside the bounds.
//! [`ScenarioRunner`] runs all of it once for a [`ScenarioConfig`], and [`Reporter`] renders the
//! result.
//!
//! See the README for an example.

#[cfg(doctest)]
use doc_comment::doctest;
#[cfg(doctest)]
doctest!("../README.md");

pub mod bounds;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod profit;
pub mod queue;
pub mod reporter;
pub mod sampling;
pub mod scenario;
pub mod visualise;

#[cfg(test)]
mod test_utils;

pub use bounds::Bounds;
pub use config::{Hotel, PriceMix, TimingAssumptions};
pub use error::{ModelError, ModelResult};
pub use ledger::{GuestLedger, GuestRecord, RoomType, Termination};
pub use profit::{ProfitEstimate, Verdict};
pub use queue::{QueueSnapshot, Resource};
pub use reporter::{Reporter, ReporterConfig};
pub use sampling::{DistributionSpec, GuestSamples, SampleStream, SamplingConfig};
pub use scenario::{ScenarioConfig, ScenarioOutcome, ScenarioRunner};
