//! Scenario runner tying bounds, sampling, queues, ledger and profit together

use bon::bon;
use tracing::{info, info_span, warn};

use crate::bounds::Bounds;
use crate::config::{Hotel, PriceMix, TimingAssumptions};
use crate::error::{ModelError, ModelResult};
use crate::ledger::{GuestLedger, Termination};
use crate::metrics::LedgerSummary;
use crate::profit::{turnover_guest_count, ProfitEstimate, Verdict};
use crate::queue::{QueueSnapshot, Resource};
use crate::sampling::{GuestSamples, SamplingConfig, DEFAULT_SAMPLE_SIZE};

/// Seed used when none is given, so default runs are reproducible.
pub const DEFAULT_SEED: u64 = 20_240_601;

/// Configuration for a verification scenario
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Scenario name for identification
    pub name: String,

    /// Seed for reproducibility (used for every sample stream)
    pub seed: Option<u64>,

    /// Draws per sample stream
    pub sample_size: usize,

    /// When to stop admitting guests to the ledger
    pub termination: Termination,

    /// Rooms, prices and staffing
    pub hotel: Hotel,

    /// Best and worst case timing for the bounds
    pub timing: TimingAssumptions,

    /// Distributions for every sample stream
    pub sampling: SamplingConfig,

    /// Split of guests between room types
    pub price_mix: PriceMix,
}

#[bon]
impl ScenarioConfig {
    #[builder]
    pub fn new(
        #[builder(into, default = String::from("default"))] name: String,
        #[builder(default = DEFAULT_SEED)] seed: u64,
        #[builder(default = DEFAULT_SAMPLE_SIZE)] sample_size: usize,
        #[builder(default)] termination: Termination,
        #[builder(default)] hotel: Hotel,
        #[builder(default)] timing: TimingAssumptions,
        #[builder(default)] sampling: SamplingConfig,
        #[builder(default)] price_mix: PriceMix,
    ) -> Self {
        Self {
            name,
            seed: Some(seed),
            sample_size,
            termination,
            hotel,
            timing,
            sampling,
            price_mix,
        }
    }

    /// Reject configurations that would produce NaNs or undefined metrics.
    pub fn validate(&self) -> ModelResult<()> {
        if self.sample_size == 0 {
            return Err(ModelError::InvalidConfig(
                "sample size must be at least 1".to_string(),
            ));
        }
        self.hotel.validate()?;
        self.timing.validate()?;
        self.sampling.validate()?;
        Ok(())
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Everything a scenario run produces
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// Name of the scenario that produced this outcome.
    pub name: String,
    /// Analytic revenue and expense bounds.
    pub bounds: Bounds,
    /// Estimated guests arriving per minute.
    pub arrival_rate: f64,
    /// One snapshot per resource, in `Resource::ALL` order.
    pub queues: Vec<QueueSnapshot>,
    /// Per-guest timelines.
    pub ledger: GuestLedger,
    /// Statistics over the ledger.
    pub summary: LedgerSummary,
    /// Point estimate from the sampled means.
    pub profit: ProfitEstimate,
    /// Where the estimate falls against the bounds.
    pub verdict: Verdict,
    /// Whether the ledger's termination disagreed with the horizon.
    pub horizon_mismatch: bool,
}

impl ScenarioOutcome {
    /// Snapshot for one resource.
    pub fn queue(&self, resource: Resource) -> Option<&QueueSnapshot> {
        self.queues.iter().find(|q| q.resource == resource)
    }
}

/// Orchestrates a verification scenario
pub struct ScenarioRunner {
    config: ScenarioConfig,
}

impl ScenarioRunner {
    /// Create a new scenario runner
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    /// The configuration this runner was built with.
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Run the scenario once, start to finish.
    pub fn run(&self) -> ModelResult<ScenarioOutcome> {
        let config = &self.config;
        let span = info_span!(
            "run scenario",
            scenario = %config.name,
            sample_size = config.sample_size as u64,
            termination = %config.termination,
        );
        let _enter = span.enter();

        config.validate()?;

        let bounds = Bounds::calculate(&config.hotel, &config.timing);
        info!(%bounds, "analytic bounds");

        let samples = GuestSamples::draw(
            &config.sampling,
            config.price_mix.premium_share(),
            config.sample_size,
            config.seed,
        )?;
        let arrival_rate = samples.arrival_rate()?;
        info!(arrival_rate, "estimated guest arrival rate per minute");

        let queues = estimate_queues(&config.hotel, &config.price_mix, &samples, arrival_rate)?;

        let ledger = GuestLedger::assemble(&samples, config.termination)?;
        let horizon = config.timing.horizon();
        let horizon_mismatch = matches!(config.termination, Termination::GuestCount(_))
            && ledger.check_horizon(horizon);
        let summary = LedgerSummary::new(&ledger, horizon);

        let guests = turnover_guest_count(
            &config.hotel,
            horizon,
            samples.stay.mean()?,
            samples.housekeeping.mean()?,
        );
        let profit = ProfitEstimate::estimate(
            guests,
            &config.price_mix,
            &config.hotel,
            bounds.expenses,
        );
        let verdict = profit.verdict(&bounds);
        if verdict == Verdict::WithinBounds {
            info!(%profit, %verdict, "profit estimate");
        } else {
            warn!(%profit, %verdict, "profit estimate outside analytic bounds");
        }

        Ok(ScenarioOutcome {
            name: config.name.clone(),
            bounds,
            arrival_rate,
            queues,
            ledger,
            summary,
            profit,
            verdict,
            horizon_mismatch,
        })
    }
}

/// Estimate every resource's queue from the sampled mean service times.
///
/// All stages share the same guest arrival rate, except the rooms, which split it by the price
/// mix.
pub fn estimate_queues(
    hotel: &Hotel,
    mix: &PriceMix,
    samples: &GuestSamples,
    arrival_rate: f64,
) -> ModelResult<Vec<QueueSnapshot>> {
    let span = info_span!("estimate queues", lambda = arrival_rate);
    let _enter = span.enter();

    Resource::ALL
        .iter()
        .map(|&resource| {
            let (lambda, mean_service, channels) = match resource {
                Resource::Reception => {
                    (arrival_rate, samples.check_in.mean()?, hotel.receptionists)
                }
                Resource::PorterIn => (arrival_rate, samples.escort_in.mean()?, hotel.porters),
                Resource::StandardRooms => (
                    arrival_rate * mix.standard_share(),
                    samples.stay.mean()?,
                    hotel.standard_rooms,
                ),
                Resource::PremiumRooms => (
                    arrival_rate * mix.premium_share(),
                    samples.stay.mean()?,
                    hotel.premium_rooms,
                ),
                Resource::PorterOut => (arrival_rate, samples.escort_out.mean()?, hotel.porters),
                Resource::Housekeeping => (
                    arrival_rate,
                    samples.housekeeping.mean()?,
                    hotel.housekeepers,
                ),
            };
            QueueSnapshot::estimate(resource, lambda, 1.0 / mean_service, channels)
        })
        .collect()
}
