//! Closed-form best-case and worst-case revenue and expense bounds.
//!
//! Revenue is bounded by room turnover: each room can be sold once per turnaround (stay plus
//! cleaning), so the shortest turnaround gives the most revenue and the longest the least.
//! Expenses are fixed by staffing and room count and don't depend on timing.

use std::fmt::{self, Display};

use crate::config::{Hotel, TimingAssumptions};

/// Analytic revenue and expense bounds for one horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Revenue when every room turns round as slowly as possible.
    pub min_revenue: f64,
    /// Revenue when every room turns round as quickly as possible.
    pub max_revenue: f64,
    /// Staff wages plus room overhead.
    pub expenses: f64,
}

impl Bounds {
    /// Compute the bounds for a hotel under the given timing assumptions.
    pub fn calculate(hotel: &Hotel, timing: &TimingAssumptions) -> Self {
        Self {
            min_revenue: min_revenue(hotel, timing),
            max_revenue: max_revenue(hotel, timing),
            expenses: fixed_expenses(hotel),
        }
    }

    /// Worst-case profit.
    pub fn min_profit(&self) -> f64 {
        self.min_revenue - self.expenses
    }

    /// Best-case profit.
    pub fn max_profit(&self) -> f64 {
        self.max_revenue - self.expenses
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "revenue: {:.2}..{:.2}, expenses: {:.2}, profit: {:.2}..{:.2}",
            self.min_revenue,
            self.max_revenue,
            self.expenses,
            self.min_profit(),
            self.max_profit()
        )
    }
}

/// Whole stays a single room completes within `horizon`.
///
/// A non-positive turnaround yields no turns.
pub fn room_turns(horizon: f64, turnaround: f64) -> u64 {
    if turnaround <= 0.0 || horizon <= 0.0 {
        return 0;
    }
    (horizon / turnaround).floor() as u64
}

/// Revenue if every room completes `turns` stays.
pub fn revenue_for_turns(hotel: &Hotel, turns: u64) -> f64 {
    let turns = turns as f64;
    hotel.standard_rooms as f64 * turns * hotel.standard_price
        + hotel.premium_rooms as f64 * turns * hotel.premium_price
}

/// Best-case revenue: shortest stays and fastest cleaning.
pub fn max_revenue(hotel: &Hotel, timing: &TimingAssumptions) -> f64 {
    revenue_for_turns(hotel, room_turns(timing.horizon, timing.best_turnaround()))
}

/// Worst-case revenue: longest stays and slowest cleaning.
pub fn min_revenue(hotel: &Hotel, timing: &TimingAssumptions) -> f64 {
    revenue_for_turns(hotel, room_turns(timing.horizon, timing.worst_turnaround()))
}

/// Wages for every role across all shifts.
pub fn staff_expenses(hotel: &Hotel) -> f64 {
    let hours = hotel.shifts as f64 * hotel.shift_hours;
    let wage_per_shift_hour = hotel.receptionists as f64 * hotel.receptionist_wage
        + hotel.porters as f64 * hotel.porter_wage
        + hotel.housekeepers as f64 * hotel.housekeeper_wage;
    wage_per_shift_hour * hours
}

/// Staff wages plus the running cost of every room.
pub fn fixed_expenses(hotel: &Hotel) -> f64 {
    staff_expenses(hotel) + hotel.total_rooms() as f64 * hotel.room_overhead
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_revenue_is_at_least_min_revenue_for_defaults() {
        let bounds = Bounds::calculate(&Hotel::default(), &TimingAssumptions::default());

        assert!(bounds.max_revenue >= bounds.min_revenue);
        assert!(bounds.max_profit() >= bounds.min_profit());
    }

    #[test]
    fn default_bounds() {
        let bounds = Bounds::calculate(&Hotel::default(), &TimingAssumptions::default());

        // Per turn: 34 * 120 + 6 * 250 = 5580
        // Best: floor(1440 / 260) = 5 turns. Worst: floor(1440 / 780) = 1 turn.
        assert_eq!(bounds.max_revenue, 27_900.0);
        assert_eq!(bounds.min_revenue, 5_580.0);

        // Wages: (2*18 + 2*15 + 3*16) * 24h = 2736. Overhead: 40 * 25 = 1000.
        assert_eq!(bounds.expenses, 3_736.0);
        assert_eq!(bounds.min_profit(), 1_844.0);
    }

    #[test]
    fn turns_are_whole_stays() {
        assert_eq!(room_turns(1440.0, 500.0), 2);
        assert_eq!(room_turns(1440.0, 1440.0), 1);
        assert_eq!(room_turns(1440.0, 2000.0), 0);
    }

    #[test]
    fn degenerate_turnaround_yields_no_turns() {
        assert_eq!(room_turns(1440.0, 0.0), 0);
        assert_eq!(room_turns(1440.0, -5.0), 0);
        assert_eq!(room_turns(0.0, 100.0), 0);
    }

    #[test]
    fn longer_horizon_never_lowers_revenue() {
        let hotel = Hotel::default();
        let day = TimingAssumptions::default();
        let week = TimingAssumptions::builder().horizon(7.0 * 1440.0).build();

        assert!(max_revenue(&hotel, &week) >= max_revenue(&hotel, &day));
        assert!(min_revenue(&hotel, &week) >= min_revenue(&hotel, &day));
    }
}
