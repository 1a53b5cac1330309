//! Per-guest timelines assembled from sampled stage durations.

use std::fmt::{self, Display};

use tracing::{debug, warn};

use crate::error::{ModelError, ModelResult};
use crate::sampling::GuestSamples;

/// When to stop admitting guests to the ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    /// Stop once this many guests have been assigned, truncating the last party if needed.
    GuestCount(usize),
    /// Admit every party arriving before this many minutes have elapsed.
    Horizon(f64),
}

impl Default for Termination {
    fn default() -> Self {
        Termination::GuestCount(100)
    }
}

impl Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::GuestCount(n) => write!(f, "{n} guests"),
            Termination::Horizon(minutes) => write!(f, "{minutes} minutes"),
        }
    }
}

/// Kind of room a party books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomType {
    /// Standard room.
    Standard,
    /// Premium room.
    Premium,
}

impl Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoomType::Standard => "standard",
            RoomType::Premium => "premium",
        })
    }
}

/// One guest's path through the hotel. All times are minutes since the start of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestRecord {
    /// Position in the ledger, starting at 0.
    pub index: usize,
    /// Arrival event the guest came in with.
    pub batch: usize,
    /// Guests from that arrival event admitted to the ledger.
    pub batch_size: usize,
    /// Room type booked by the party.
    pub room_type: RoomType,
    /// Arrival at the front desk.
    pub arrival: f64,
    /// Minutes at the front desk.
    pub check_in: f64,
    /// Minutes with a porter on the way in.
    pub escort_in: f64,
    /// Minutes in the room.
    pub stay: f64,
    /// Minutes with a porter on the way out.
    pub escort_out: f64,
    /// Minutes cleaning the room afterwards.
    pub housekeeping: f64,
}

impl GuestRecord {
    /// When the guest reaches the room.
    pub fn room_entry(&self) -> f64 {
        self.arrival + self.check_in + self.escort_in
    }

    /// When the guest leaves the room.
    pub fn checkout(&self) -> f64 {
        self.room_entry() + self.stay
    }

    /// When the guest leaves the hotel.
    pub fn exit(&self) -> f64 {
        self.checkout() + self.escort_out
    }

    /// When the room can be sold again.
    pub fn room_ready(&self) -> f64 {
        self.checkout() + self.housekeeping
    }

    /// Total minutes the guest spends on the premises.
    pub fn time_in_hotel(&self) -> f64 {
        self.exit() - self.arrival
    }
}

/// Immutable table of guest records in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestLedger {
    guests: Vec<GuestRecord>,
    batches: usize,
}

impl GuestLedger {
    /// Walk the arrival events, giving every guest in a party that party's durations.
    ///
    /// Arrival times accumulate across events, so each row's timeline follows on from the
    /// previous one.
    ///
    /// Fails with `InvalidConfig` if the streams don't all have the same number of draws.
    pub fn assemble(samples: &GuestSamples, termination: Termination) -> ModelResult<Self> {
        samples.check_lengths()?;

        let mut guests = Vec::new();
        let mut batches = 0;
        let mut arrival = 0.0;

        for event in 0..samples.len() {
            let remaining = match termination {
                Termination::GuestCount(cutoff) => cutoff - guests.len(),
                Termination::Horizon(_) => usize::MAX,
            };
            if remaining == 0 {
                break;
            }

            arrival += samples.inter_arrival.values()[event];
            if let Termination::Horizon(horizon) = termination {
                if arrival >= horizon {
                    break;
                }
            }

            let batch_size = samples.group_size[event].min(remaining);
            let room_type = if samples.premium[event] {
                RoomType::Premium
            } else {
                RoomType::Standard
            };

            for _ in 0..batch_size {
                guests.push(GuestRecord {
                    index: guests.len(),
                    batch: event,
                    batch_size,
                    room_type,
                    arrival,
                    check_in: samples.check_in.values()[event],
                    escort_in: samples.escort_in.values()[event],
                    stay: samples.stay.values()[event],
                    escort_out: samples.escort_out.values()[event],
                    housekeeping: samples.housekeeping.values()[event],
                });
            }
            batches += 1;
        }

        if let Termination::GuestCount(cutoff) = termination {
            if guests.len() < cutoff {
                return Err(ModelError::SamplesExhausted {
                    assigned: guests.len(),
                    cutoff,
                });
            }
        }

        debug!(guests = guests.len(), batches, "assembled guest ledger");

        Ok(Self { guests, batches })
    }

    /// Every guest, in arrival order.
    pub fn guests(&self) -> &[GuestRecord] {
        &self.guests
    }

    /// Number of guests.
    pub fn len(&self) -> usize {
        self.guests.len()
    }

    /// Whether the ledger has no guests.
    pub fn is_empty(&self) -> bool {
        self.guests.is_empty()
    }

    /// Number of arrival events with at least one guest in the ledger.
    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Size of each admitted party, in arrival order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.batches);
        let mut last_batch = None;
        for guest in &self.guests {
            if last_batch != Some(guest.batch) {
                sizes.push(guest.batch_size);
                last_batch = Some(guest.batch);
            }
        }
        sizes
    }

    /// Guests who have checked out by `horizon`.
    pub fn checked_out_by(&self, horizon: f64) -> impl Iterator<Item = &GuestRecord> {
        self.guests.iter().filter(move |g| g.checkout() <= horizon)
    }

    /// Arrival time of the last guest admitted.
    pub fn last_arrival(&self) -> Option<f64> {
        self.guests.last().map(|g| g.arrival)
    }

    /// Latest checkout across all guests.
    pub fn last_checkout(&self) -> Option<f64> {
        self.guests.iter().map(GuestRecord::checkout).reduce(f64::max)
    }

    /// Fraction of guests in premium rooms.
    pub fn premium_share(&self) -> f64 {
        if self.guests.is_empty() {
            return 0.0;
        }
        let premium = self
            .guests
            .iter()
            .filter(|g| g.room_type == RoomType::Premium)
            .count();
        premium as f64 / self.guests.len() as f64
    }

    /// Log when a guest-count cutoff covers a different period than the horizon.
    ///
    /// A cutoff stops on a guest count, not a time, so any non-empty ledger either stops
    /// arriving before `horizon` or admits arrivals at or after it. Returns whether the ledger
    /// has guests, i.e. whether the two disagree.
    pub fn check_horizon(&self, horizon: f64) -> bool {
        let Some(last_arrival) = self.last_arrival() else {
            return false;
        };
        if last_arrival < horizon {
            warn!(
                guests = self.len(),
                last_arrival,
                horizon,
                "guest cutoff reached before the end of the horizon"
            );
        } else {
            let late = self.guests.iter().filter(|g| g.arrival >= horizon).count();
            warn!(late, horizon, "guests arriving after the end of the horizon are included");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{Sample, SamplingConfig};
    use crate::test_utils::TEST_SEED;

    fn fixed_samples(group_size: Vec<usize>) -> GuestSamples {
        let n = group_size.len();
        let constant = |name, value| Sample::from_values(name, vec![value; n]);
        GuestSamples {
            inter_arrival: constant("inter-arrival", 10.0),
            group_size,
            check_in: constant("check-in", 4.0),
            escort_in: constant("escort-in", 6.0),
            stay: constant("stay", 400.0),
            escort_out: constant("escort-out", 5.0),
            housekeeping: constant("housekeeping", 30.0),
            premium: (0..n).map(|i| i % 2 == 1).collect(),
        }
    }

    #[test]
    fn assigned_guests_equal_cutoff() {
        let samples =
            GuestSamples::draw(&SamplingConfig::default(), 0.15, 1000, Some(*TEST_SEED)).unwrap();

        for cutoff in [1, 2, 3, 100, 999] {
            let ledger = GuestLedger::assemble(&samples, Termination::GuestCount(cutoff)).unwrap();
            assert_eq!(ledger.len(), cutoff);
            assert!(ledger.batch_sizes().iter().all(|b| (1..=3).contains(b)));
            assert_eq!(ledger.batch_sizes().iter().sum::<usize>(), cutoff);
        }
    }

    #[test]
    fn last_party_is_truncated_at_cutoff() {
        let samples = fixed_samples(vec![3, 3, 3]);
        let ledger = GuestLedger::assemble(&samples, Termination::GuestCount(4)).unwrap();

        assert_eq!(ledger.batch_sizes(), vec![3, 1]);
        assert_eq!(ledger.batches(), 2);
    }

    #[test]
    fn party_shares_durations() {
        let samples = fixed_samples(vec![2, 1]);
        let ledger = GuestLedger::assemble(&samples, Termination::GuestCount(3)).unwrap();
        let guests = ledger.guests();

        assert_eq!(guests[0].arrival, guests[1].arrival);
        assert_eq!(guests[0].batch, guests[1].batch);
        assert_eq!(guests[0].room_type, RoomType::Standard);
        assert_eq!(guests[2].room_type, RoomType::Premium);
        assert_eq!(guests[2].index, 2);
    }

    #[test]
    fn timelines_are_chained() {
        let samples = fixed_samples(vec![1, 1, 1]);
        let ledger = GuestLedger::assemble(&samples, Termination::GuestCount(3)).unwrap();
        let guests = ledger.guests();

        assert_eq!(guests[0].arrival, 10.0);
        assert_eq!(guests[1].arrival, 20.0);
        assert_eq!(guests[2].arrival, 30.0);

        let g = &guests[0];
        assert_eq!(g.room_entry(), 20.0);
        assert_eq!(g.checkout(), 420.0);
        assert_eq!(g.exit(), 425.0);
        assert_eq!(g.room_ready(), 450.0);
        assert_eq!(g.time_in_hotel(), 415.0);
    }

    #[test]
    fn sampled_timelines_are_monotone() {
        let samples =
            GuestSamples::draw(&SamplingConfig::default(), 0.15, 1000, Some(*TEST_SEED)).unwrap();
        let ledger = GuestLedger::assemble(&samples, Termination::GuestCount(500)).unwrap();

        for pair in ledger.guests().windows(2) {
            assert!(pair[0].arrival <= pair[1].arrival);
        }
        for g in ledger.guests() {
            assert!(g.arrival < g.room_entry());
            assert!(g.room_entry() < g.checkout());
            assert!(g.checkout() < g.exit());
            assert!(g.checkout() < g.room_ready());
        }
    }

    #[test]
    fn running_out_of_samples_is_an_error() {
        let samples = fixed_samples(vec![1, 2]);

        assert_eq!(
            GuestLedger::assemble(&samples, Termination::GuestCount(5)),
            Err(ModelError::SamplesExhausted {
                assigned: 3,
                cutoff: 5
            })
        );
    }

    #[test]
    fn horizon_termination_stops_arrivals() {
        let samples = fixed_samples(vec![1; 10]);
        let ledger = GuestLedger::assemble(&samples, Termination::Horizon(45.0)).unwrap();

        // Arrivals at 10, 20, 30 and 40.
        assert_eq!(ledger.len(), 4);
        assert!(ledger.guests().iter().all(|g| g.arrival < 45.0));
    }

    #[test]
    fn checkouts_within_horizon() {
        let samples = fixed_samples(vec![1; 5]);
        let ledger = GuestLedger::assemble(&samples, Termination::GuestCount(5)).unwrap();

        // Checkouts at 420, 430, 440, 450, 460.
        assert_eq!(ledger.checked_out_by(440.0).count(), 3);
        assert_eq!(ledger.last_checkout(), Some(460.0));
    }

    #[test]
    fn detects_cutoff_horizon_mismatch() {
        let samples = fixed_samples(vec![1; 5]);
        let ledger = GuestLedger::assemble(&samples, Termination::GuestCount(5)).unwrap();

        assert!(ledger.check_horizon(1440.0), "cutoff ends early");
        assert!(ledger.check_horizon(25.0), "cutoff overruns");
    }

    #[test]
    fn empty_cutoff_ledger_has_no_mismatch() {
        let samples = fixed_samples(vec![1; 5]);
        let ledger = GuestLedger::assemble(&samples, Termination::GuestCount(0)).unwrap();

        assert!(ledger.is_empty());
        assert!(!ledger.check_horizon(1440.0));
    }

    #[test]
    fn mismatched_stream_lengths_are_rejected() {
        let mut samples = fixed_samples(vec![1, 1]);
        samples.stay = Sample::from_values("stay", vec![]);
        samples.premium = vec![];

        match GuestLedger::assemble(&samples, Termination::GuestCount(2)) {
            Err(ModelError::InvalidConfig(reason)) => assert!(reason.contains("stay"), "{reason}"),
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn short_group_sizes_are_rejected_for_horizon_runs() {
        let mut samples = fixed_samples(vec![1, 1, 1]);
        samples.group_size.truncate(1);

        assert!(matches!(
            GuestLedger::assemble(&samples, Termination::Horizon(1440.0)),
            Err(ModelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn premium_share_counts_guests() {
        let samples = fixed_samples(vec![3, 1]);
        let ledger = GuestLedger::assemble(&samples, Termination::GuestCount(4)).unwrap();

        assert_eq!(ledger.premium_share(), 0.25);
    }
}
