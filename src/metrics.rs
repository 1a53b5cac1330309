//! Summary statistics over the guest ledger.

use std::collections::HashMap;

use crate::ledger::{GuestLedger, GuestRecord};

/// A duration measured for every guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Front desk.
    CheckIn,
    /// Porter on the way in.
    EscortIn,
    /// Time in the room.
    Stay,
    /// Porter on the way out.
    EscortOut,
    /// Cleaning after checkout.
    Housekeeping,
    /// Arrival to exit.
    TimeInHotel,
}

impl Stage {
    /// Every stage, in the order a guest meets them.
    pub const ALL: [Stage; 6] = [
        Stage::CheckIn,
        Stage::EscortIn,
        Stage::Stay,
        Stage::EscortOut,
        Stage::Housekeeping,
        Stage::TimeInHotel,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::CheckIn => "check-in",
            Stage::EscortIn => "escort-in",
            Stage::Stay => "stay",
            Stage::EscortOut => "escort-out",
            Stage::Housekeeping => "housekeeping",
            Stage::TimeInHotel => "time in hotel",
        }
    }

    /// This stage's duration for one guest.
    pub fn duration(&self, guest: &GuestRecord) -> f64 {
        match self {
            Stage::CheckIn => guest.check_in,
            Stage::EscortIn => guest.escort_in,
            Stage::Stay => guest.stay,
            Stage::EscortOut => guest.escort_out,
            Stage::Housekeeping => guest.housekeeping,
            Stage::TimeInHotel => guest.time_in_hotel(),
        }
    }
}

/// Distribution of one stage's duration across the ledger, in minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct StageStats {
    /// The stage being summarised.
    pub stage: Stage,
    /// Mean duration.
    pub mean: f64,
    /// Median duration.
    pub p50: f64,
    /// 99th percentile duration.
    pub p99: f64,
    /// Shortest duration.
    pub min: f64,
    /// Longest duration.
    pub max: f64,
}

impl StageStats {
    /// Summarise one stage. Returns `None` for an empty ledger.
    pub fn for_stage(ledger: &GuestLedger, stage: Stage) -> Option<Self> {
        if ledger.is_empty() {
            return None;
        }

        let mut durations: Vec<f64> = ledger.guests().iter().map(|g| stage.duration(g)).collect();
        durations.sort_by(f64::total_cmp);

        Some(Self {
            stage,
            mean: mean(&durations),
            p50: percentile(&durations, 0.5),
            p99: percentile(&durations, 0.99),
            min: durations[0],
            max: durations[durations.len() - 1],
        })
    }
}

/// Analysis of party sizes in the ledger
#[derive(Debug, Default)]
pub struct BatchDistribution {
    /// Parties with at least one guest in the ledger.
    pub total_batches: usize,
    /// Mean admitted party size.
    pub mean_batch_size: f64,
    /// Median admitted party size.
    pub median_batch_size: f64,
    /// Number of parties of each size.
    pub size_distribution: HashMap<usize, usize>,
}

impl BatchDistribution {
    /// Analyse the parties admitted to a ledger.
    pub fn for_ledger(ledger: &GuestLedger) -> Self {
        let mut batch_sizes = ledger.batch_sizes();
        if batch_sizes.is_empty() {
            return Self::default();
        }
        batch_sizes.sort_unstable();

        let total_batches = batch_sizes.len();
        let sum: usize = batch_sizes.iter().sum();

        Self {
            total_batches,
            mean_batch_size: sum as f64 / total_batches as f64,
            median_batch_size: calculate_median(&batch_sizes),
            size_distribution: build_frequency_map(&batch_sizes),
        }
    }

    /// Percentage of parties of a given size.
    pub fn percentage_of(&self, size: usize) -> f64 {
        if self.total_batches == 0 {
            0.0
        } else {
            let count = self.size_distribution.get(&size).copied().unwrap_or(0);
            (count as f64 / self.total_batches as f64) * 100.0
        }
    }

    /// (batch_size, count) pairs sorted by batch size
    pub fn size_distribution_sorted(&self) -> Vec<(usize, usize)> {
        let mut data: Vec<_> = self
            .size_distribution
            .iter()
            .map(|(size, count)| (*size, *count))
            .collect();
        data.sort_by_key(|(size, _)| *size);
        data
    }
}

/// Everything the report tabulates about a ledger.
#[derive(Debug)]
pub struct LedgerSummary {
    /// Guests in the ledger.
    pub guests: usize,
    /// Duration statistics, one per `Stage`.
    pub stages: Vec<StageStats>,
    /// Party sizes.
    pub batches: BatchDistribution,
    /// Fraction of guests in premium rooms.
    pub premium_share: f64,
    /// Guests whose checkout falls within the horizon.
    pub checked_out_within_horizon: usize,
    /// Latest checkout, if there are any guests.
    pub last_checkout: Option<f64>,
}

impl LedgerSummary {
    /// Summarise a ledger against the horizon it was meant to cover.
    pub fn new(ledger: &GuestLedger, horizon: f64) -> Self {
        Self {
            guests: ledger.len(),
            stages: Stage::ALL
                .iter()
                .filter_map(|stage| StageStats::for_stage(ledger, *stage))
                .collect(),
            batches: BatchDistribution::for_ledger(ledger),
            premium_share: ledger.premium_share(),
            checked_out_within_horizon: ledger.checked_out_by(horizon).count(),
            last_checkout: ledger.last_checkout(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate percentile from sorted data, interpolating between ranks
fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    if sorted_data.len() == 1 {
        return sorted_data[0];
    }

    let rank = p * (sorted_data.len() - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;
    let weight = rank - lower_idx as f64;

    sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
}

/// Calculate median from sorted values
fn calculate_median(sorted_values: &[usize]) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let len = sorted_values.len();
    if len % 2 == 0 {
        let mid = len / 2;
        (sorted_values[mid - 1] + sorted_values[mid]) as f64 / 2.0
    } else {
        sorted_values[len / 2] as f64
    }
}

/// Build a frequency map counting occurrences of each value
fn build_frequency_map<T: Eq + std::hash::Hash + Copy>(values: &[T]) -> HashMap<T, usize> {
    let mut map = HashMap::new();
    for value in values {
        *map.entry(*value).or_insert(0) += 1;
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Termination;
    use crate::sampling::{GuestSamples, Sample};

    fn ledger(group_size: Vec<usize>, cutoff: usize) -> GuestLedger {
        let n = group_size.len();
        let ramp = |name, start: f64| {
            Sample::from_values(name, (0..n).map(|i| start + i as f64).collect())
        };
        let samples = GuestSamples {
            inter_arrival: ramp("inter-arrival", 10.0),
            group_size,
            check_in: ramp("check-in", 2.0),
            escort_in: ramp("escort-in", 3.0),
            stay: ramp("stay", 300.0),
            escort_out: ramp("escort-out", 3.0),
            housekeeping: ramp("housekeeping", 25.0),
            premium: vec![false; n],
        };
        GuestLedger::assemble(&samples, Termination::GuestCount(cutoff)).unwrap()
    }

    #[test]
    fn test_calculate_median() {
        assert_eq!(calculate_median(&[]), 0.0);
        assert_eq!(calculate_median(&[5]), 5.0);
        assert_eq!(calculate_median(&[3, 7]), 5.0);
        assert_eq!(calculate_median(&[1, 2, 3, 4, 5]), 3.0);
        assert_eq!(calculate_median(&[1, 2, 3, 4]), 2.5);
    }

    #[test]
    fn test_build_frequency_map() {
        let map: HashMap<usize, usize> = build_frequency_map(&[]);
        assert!(map.is_empty());

        let map = build_frequency_map(&[1, 2, 2, 3, 3, 3]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&1), Some(&1));
        assert_eq!(map.get(&2), Some(&2));
        assert_eq!(map.get(&3), Some(&3));
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 0.5), 3.0);
        assert_eq!(percentile(&data, 1.0), 5.0);
        assert_eq!(percentile(&data, 0.125), 1.5);
        assert_eq!(percentile(&[7.0], 0.99), 7.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }

    #[test]
    fn stage_stats_cover_every_guest() {
        let ledger = ledger(vec![1, 1, 1], 3);
        let stats = StageStats::for_stage(&ledger, Stage::Stay).unwrap();

        assert_eq!(stats.min, 300.0);
        assert_eq!(stats.max, 302.0);
        assert_eq!(stats.mean, 301.0);
        assert_eq!(stats.p50, 301.0);
    }

    #[test]
    fn batch_distribution_counts_parties() {
        let ledger = ledger(vec![1, 3, 3, 2], 9);
        let batches = BatchDistribution::for_ledger(&ledger);

        assert_eq!(batches.total_batches, 4);
        assert_eq!(batches.mean_batch_size, 2.25);
        assert_eq!(batches.median_batch_size, 2.5);
        assert_eq!(
            batches.size_distribution_sorted(),
            vec![(1, 1), (2, 1), (3, 2)]
        );
        assert_eq!(batches.percentage_of(3), 50.0);
    }

    #[test]
    fn summary_counts_guests_within_horizon() {
        let ledger = ledger(vec![2, 2], 4);
        let summary = LedgerSummary::new(&ledger, 330.0);

        // Room entry at 10+2+3=15 and 21+3+4=28; checkouts at 315 and 329.
        assert_eq!(summary.guests, 4);
        assert_eq!(summary.checked_out_within_horizon, 4);
        assert_eq!(summary.last_checkout, Some(329.0));
        assert_eq!(summary.stages.len(), Stage::ALL.len());
        assert_eq!(summary.premium_share, 0.0);

        let summary = LedgerSummary::new(&ledger, 320.0);
        assert_eq!(summary.checked_out_within_horizon, 2);
    }
}
