//! Seeded draws for arrivals, group sizes and service durations.

use std::fmt::{self, Display};

use bon::bon;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_distr::{Bernoulli, Distribution, LogNormal, Triangular, Uniform};

use crate::error::{ModelError, ModelResult};

/// Default number of draws per stream.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Largest party that arrives together.
pub const MAX_GROUP_SIZE: usize = 3;

/// Parameters of a continuous distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributionSpec {
    /// Triangular over `[min, max]` peaking at `mode`.
    Triangular {
        /// Lower limit.
        min: f64,
        /// Most likely value.
        mode: f64,
        /// Upper limit.
        max: f64,
    },
    /// Uniform over `[min, max)`.
    Uniform {
        /// Lower limit.
        min: f64,
        /// Upper limit.
        max: f64,
    },
    /// Log-normal, i.e. `exp(N(mu, sigma²))`.
    LogNormal {
        /// Mean of the underlying normal.
        mu: f64,
        /// Standard deviation of the underlying normal.
        sigma: f64,
    },
}

impl DistributionSpec {
    /// The interval every draw falls in. Log-normal draws are positive but unbounded.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            DistributionSpec::Triangular { min, max, .. } => (min, max),
            DistributionSpec::Uniform { min, max } => (min, max),
            DistributionSpec::LogNormal { .. } => (0.0, f64::INFINITY),
        }
    }

    /// Expected value of a draw.
    pub fn mean(&self) -> f64 {
        match *self {
            DistributionSpec::Triangular { min, mode, max } => (min + mode + max) / 3.0,
            DistributionSpec::Uniform { min, max } => (min + max) / 2.0,
            DistributionSpec::LogNormal { mu, sigma } => (mu + sigma * sigma / 2.0).exp(),
        }
    }

    fn build(&self, stream: &'static str) -> ModelResult<Sampler> {
        let invalid = |reason: String| ModelError::InvalidDistribution { stream, reason };

        match *self {
            DistributionSpec::Triangular { min, mode, max } => {
                if ![min, mode, max].iter().all(|x| x.is_finite()) {
                    return Err(invalid(format!(
                        "parameters must be finite, got min {min}, mode {mode}, max {max}"
                    )));
                }
                if !(min < max) {
                    return Err(invalid(format!("min {min} must be below max {max}")));
                }
                Triangular::new(min, max, mode)
                    .map(Sampler::Triangular)
                    .map_err(|e| invalid(format!("{e} (min {min}, mode {mode}, max {max})")))
            }
            DistributionSpec::Uniform { min, max } => {
                if !(min.is_finite() && max.is_finite()) {
                    return Err(invalid(format!(
                        "parameters must be finite, got min {min}, max {max}"
                    )));
                }
                Uniform::new(min, max)
                    .map(Sampler::Uniform)
                    .map_err(|e| invalid(format!("{e} (min {min}, max {max})")))
            }
            DistributionSpec::LogNormal { mu, sigma } => {
                if !mu.is_finite() {
                    return Err(invalid(format!("mu must be finite, got {mu}")));
                }
                if !(sigma > 0.0) {
                    return Err(invalid(format!("sigma must be positive, got {sigma}")));
                }
                LogNormal::new(mu, sigma)
                    .map(Sampler::LogNormal)
                    .map_err(|e| invalid(format!("{e} (mu {mu}, sigma {sigma})")))
            }
        }
    }
}

impl Display for DistributionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionSpec::Triangular { min, mode, max } => {
                write!(f, "Triangular({min}, {mode}, {max})")
            }
            DistributionSpec::Uniform { min, max } => write!(f, "Uniform({min}, {max})"),
            DistributionSpec::LogNormal { mu, sigma } => write!(f, "LogNormal({mu}, {sigma})"),
        }
    }
}

enum Sampler {
    Triangular(Triangular<f64>),
    Uniform(Uniform<f64>),
    LogNormal(LogNormal<f64>),
}

impl Distribution<f64> for Sampler {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Triangular(d) => d.sample(rng),
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::LogNormal(d) => d.sample(rng),
        }
    }
}

/// A finite stream of draws from one distribution.
///
/// Yields exactly as many values as requested and cannot be restarted. Two streams built from
/// the same spec and seed yield the same values.
pub struct SampleStream {
    sampler: Sampler,
    rng: StdRng,
    remaining: usize,
}

impl SampleStream {
    /// Create a stream of `len` draws.
    ///
    /// # Arguments
    /// * `stream` - Name used in errors
    /// * `spec` - Distribution to draw from
    /// * `len` - Number of draws
    /// * `seed` - Optional seed for reproducibility
    pub fn new(
        stream: &'static str,
        spec: &DistributionSpec,
        len: usize,
        seed: Option<u64>,
    ) -> ModelResult<Self> {
        Ok(Self {
            sampler: spec.build(stream)?,
            rng: seeded_rng(seed),
            remaining: len,
        })
    }
}

impl Iterator for SampleStream {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.sampler.sample(&mut self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SampleStream {}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// All draws from one stream, kept for statistics and per-guest lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    name: &'static str,
    values: Vec<f64>,
}

impl Sample {
    /// Collect every remaining draw from a stream.
    pub fn collect(name: &'static str, stream: SampleStream) -> Self {
        Self {
            name,
            values: stream.collect(),
        }
    }

    /// Wrap values drawn elsewhere.
    pub fn from_values(name: &'static str, values: Vec<f64>) -> Self {
        Self { name, values }
    }

    /// Name of the stream the draws came from.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The draws, in the order they were made.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of draws.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no draws.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The `i`th draw.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied()
    }

    /// Arithmetic mean of the draws.
    pub fn mean(&self) -> ModelResult<f64> {
        if self.values.is_empty() {
            return Err(ModelError::EmptySample(self.name));
        }
        Ok(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Smallest draw.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Largest draw.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}

/// Distributions for every stream the model draws from.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct SamplingConfig {
    pub(crate) inter_arrival: DistributionSpec,
    pub(crate) group_size: DistributionSpec,
    pub(crate) check_in: DistributionSpec,
    pub(crate) escort_in: DistributionSpec,
    pub(crate) stay: DistributionSpec,
    pub(crate) escort_out: DistributionSpec,
    pub(crate) housekeeping: DistributionSpec,
}

#[bon]
impl SamplingConfig {
    #[allow(missing_docs)]
    #[builder]
    pub fn new(
        /// Minutes between arrival events.
        #[builder(default = DistributionSpec::Triangular { min: 10.0, mode: 20.0, max: 45.0 })]
        inter_arrival: DistributionSpec,
        /// Party size before flooring. Must stay within `[1, MAX_GROUP_SIZE + 1]`.
        #[builder(default = DistributionSpec::Triangular { min: 1.0, mode: 1.0, max: 4.0 })]
        group_size: DistributionSpec,
        /// Minutes at the front desk.
        #[builder(default = DistributionSpec::Uniform { min: 2.0, max: 6.0 })]
        check_in: DistributionSpec,
        /// Minutes for a porter to take a party to its room.
        #[builder(default = DistributionSpec::Uniform { min: 3.0, max: 10.0 })]
        escort_in: DistributionSpec,
        /// Minutes a party occupies its room.
        #[builder(default = DistributionSpec::Triangular { min: 240.0, mode: 480.0, max: 720.0 })]
        stay: DistributionSpec,
        /// Minutes for a porter to see a party out.
        #[builder(default = DistributionSpec::Uniform { min: 3.0, max: 10.0 })]
        escort_out: DistributionSpec,
        /// Minutes to clean a room after checkout.
        #[builder(default = DistributionSpec::LogNormal { mu: 3.4, sigma: 0.35 })]
        housekeeping: DistributionSpec,
    ) -> Self {
        Self {
            inter_arrival,
            group_size,
            check_in,
            escort_in,
            stay,
            escort_out,
            housekeeping,
        }
    }

    /// Check every distribution can be built and draws only sensible values.
    pub(crate) fn validate(&self) -> ModelResult<()> {
        for (stream, spec) in self.streams() {
            spec.build(stream)?;
            let (low, _) = spec.support();
            if low < 0.0 {
                return Err(ModelError::InvalidDistribution {
                    stream,
                    reason: format!("durations can't be negative, {spec} allows {low}"),
                });
            }
        }

        let (low, high) = self.group_size.support();
        if low < 1.0 || high > (MAX_GROUP_SIZE + 1) as f64 {
            return Err(ModelError::InvalidDistribution {
                stream: "group size",
                reason: format!(
                    "support {low}..{high} must lie within 1..{}",
                    MAX_GROUP_SIZE + 1
                ),
            });
        }
        Ok(())
    }

    fn streams(&self) -> [(&'static str, &DistributionSpec); 7] {
        [
            ("inter-arrival", &self.inter_arrival),
            ("group size", &self.group_size),
            ("check-in", &self.check_in),
            ("escort-in", &self.escort_in),
            ("stay", &self.stay),
            ("escort-out", &self.escort_out),
            ("housekeeping", &self.housekeeping),
        ]
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// One batch's worth of draws for every stream, indexed by arrival event.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestSamples {
    /// Minutes since the previous arrival event.
    pub inter_arrival: Sample,
    /// Party size of each arrival event, in `1..=MAX_GROUP_SIZE`.
    pub group_size: Vec<usize>,
    /// Front desk minutes.
    pub check_in: Sample,
    /// Porter minutes on the way in.
    pub escort_in: Sample,
    /// Minutes in the room.
    pub stay: Sample,
    /// Porter minutes on the way out.
    pub escort_out: Sample,
    /// Cleaning minutes after checkout.
    pub housekeeping: Sample,
    /// Whether each party books a premium room.
    pub premium: Vec<bool>,
}

impl GuestSamples {
    /// Draw `len` values for every stream.
    ///
    /// Each stream gets its own RNG seeded from `seed`, so streams are independent of each
    /// other but the whole draw is reproducible.
    pub fn draw(
        config: &SamplingConfig,
        premium_share: f64,
        len: usize,
        seed: Option<u64>,
    ) -> ModelResult<Self> {
        config.validate()?;
        let premium_dist =
            Bernoulli::new(premium_share).map_err(|e| ModelError::InvalidDistribution {
                stream: "premium",
                reason: format!("{e} (p = {premium_share})"),
            })?;

        let mut seeder = seeded_rng(seed);
        let mut stream = |name: &'static str, spec: &DistributionSpec| {
            SampleStream::new(name, spec, len, Some(seeder.next_u64()))
                .map(|s| Sample::collect(name, s))
        };

        let inter_arrival = stream("inter-arrival", &config.inter_arrival)?;
        let group_size = stream("group size", &config.group_size)?
            .values()
            .iter()
            .map(|&x| (x.floor() as usize).clamp(1, MAX_GROUP_SIZE))
            .collect();
        let check_in = stream("check-in", &config.check_in)?;
        let escort_in = stream("escort-in", &config.escort_in)?;
        let stay = stream("stay", &config.stay)?;
        let escort_out = stream("escort-out", &config.escort_out)?;
        let housekeeping = stream("housekeeping", &config.housekeeping)?;

        let mut premium_rng = StdRng::seed_from_u64(seeder.next_u64());
        let premium = (0..len)
            .map(|_| premium_dist.sample(&mut premium_rng))
            .collect();

        Ok(Self {
            inter_arrival,
            group_size,
            check_in,
            escort_in,
            stay,
            escort_out,
            housekeeping,
            premium,
        })
    }

    /// Number of arrival events drawn.
    pub fn len(&self) -> usize {
        self.inter_arrival.len()
    }

    /// Whether nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.inter_arrival.is_empty()
    }

    /// Check every stream has a value for every arrival event.
    pub fn check_lengths(&self) -> ModelResult<()> {
        let len = self.len();
        let lengths = [
            ("group size", self.group_size.len()),
            ("check-in", self.check_in.len()),
            ("escort-in", self.escort_in.len()),
            ("stay", self.stay.len()),
            ("escort-out", self.escort_out.len()),
            ("housekeeping", self.housekeeping.len()),
            ("premium", self.premium.len()),
        ];
        match lengths.iter().find(|(_, n)| *n != len) {
            Some((stream, n)) => Err(ModelError::InvalidConfig(format!(
                "{stream} has {n} draws but there are {len} arrival events"
            ))),
            None => Ok(()),
        }
    }

    /// Mean party size across all arrival events.
    pub fn mean_group_size(&self) -> ModelResult<f64> {
        if self.group_size.is_empty() {
            return Err(ModelError::EmptySample("group size"));
        }
        Ok(self.group_size.iter().sum::<usize>() as f64 / self.group_size.len() as f64)
    }

    /// Guests arriving per minute: mean party size over mean inter-arrival time.
    pub fn arrival_rate(&self) -> ModelResult<f64> {
        Ok(self.mean_group_size()? / self.inter_arrival.mean()?)
    }
}
