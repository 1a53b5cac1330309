//! Profit point estimate compared against the analytic bounds.

use std::fmt::{self, Display};

use crate::bounds::{room_turns, Bounds};
use crate::config::{Hotel, PriceMix};

/// Where a point estimate falls relative to the analytic profit bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Below the worst-case profit.
    BelowBounds,
    /// Between the worst-case and best-case profit, inclusive.
    WithinBounds,
    /// Above the best-case profit.
    AboveBounds,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::BelowBounds => "below bounds",
            Verdict::WithinBounds => "within bounds",
            Verdict::AboveBounds => "above bounds",
        })
    }
}

/// Single-figure profit estimate for a guest count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitEstimate {
    /// Guests paying for a stay.
    pub guests: u64,
    /// Average price per guest under the price mix.
    pub blended_price: f64,
    /// `guests * blended_price`.
    pub revenue: f64,
    /// Fixed expenses carried over from the bounds.
    pub expenses: f64,
    /// `revenue - expenses`.
    pub profit: f64,
}

impl ProfitEstimate {
    /// Combine a guest count, a price mix and the fixed expenses.
    pub fn estimate(guests: u64, mix: &PriceMix, hotel: &Hotel, expenses: f64) -> Self {
        let blended_price = mix.blended_price(hotel);
        let revenue = guests as f64 * blended_price;
        Self {
            guests,
            blended_price,
            revenue,
            expenses,
            profit: revenue - expenses,
        }
    }

    /// Classify this estimate against the analytic profit bounds.
    pub fn verdict(&self, bounds: &Bounds) -> Verdict {
        // Allow for rounding between the per-type bound sum and the blended price.
        let slack = 1e-6 * bounds.max_revenue.abs().max(1.0);
        if self.profit < bounds.min_profit() - slack {
            Verdict::BelowBounds
        } else if self.profit > bounds.max_profit() + slack {
            Verdict::AboveBounds
        } else {
            Verdict::WithinBounds
        }
    }

    /// Whether the estimate lies between the worst-case and best-case profit.
    pub fn within(&self, bounds: &Bounds) -> bool {
        self.verdict(bounds) == Verdict::WithinBounds
    }
}

impl Display for ProfitEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} guests @ {:.2} = {:.2} revenue, {:.2} profit",
            self.guests, self.blended_price, self.revenue, self.profit
        )
    }
}

/// Guests the whole hotel serves in `horizon` when every stay and cleaning takes the mean time.
///
/// Uses the same whole-turn rule as the bounds, so it is comparable with them.
pub fn turnover_guest_count(
    hotel: &Hotel,
    horizon: f64,
    mean_stay: f64,
    mean_cleaning: f64,
) -> u64 {
    hotel.total_rooms() as u64 * room_turns(horizon, mean_stay + mean_cleaning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingAssumptions;

    #[test]
    fn profit_is_revenue_less_expenses() {
        let hotel = Hotel::default();
        let estimate = ProfitEstimate::estimate(80, &PriceMix::default(), &hotel, 3_736.0);

        // 0.85 * 120 + 0.15 * 250 = 139.5
        assert!((estimate.blended_price - 139.5).abs() < 1e-9);
        assert!((estimate.revenue - 11_160.0).abs() < 1e-6);
        assert!((estimate.profit - 7_424.0).abs() < 1e-6);
    }

    #[test]
    fn turnover_count_for_mean_durations() {
        let hotel = Hotel::default();

        // floor(1440 / 510) = 2 turns for each of 40 rooms.
        assert_eq!(turnover_guest_count(&hotel, 1440.0, 480.0, 30.0), 80);
    }

    #[test]
    fn mean_turnover_lands_within_bounds() {
        let hotel = Hotel::default();
        let timing = TimingAssumptions::default();
        let bounds = Bounds::calculate(&hotel, &timing);

        for mean_stay in [240.0, 300.0, 480.0, 600.0, 720.0] {
            let guests = turnover_guest_count(&hotel, timing.horizon(), mean_stay, 40.0);
            let estimate =
                ProfitEstimate::estimate(guests, &PriceMix::default(), &hotel, bounds.expenses);
            assert!(
                estimate.within(&bounds),
                "stay {mean_stay}: {estimate} outside {bounds}"
            );
        }
    }

    #[test]
    fn verdict_flags_estimates_outside_bounds() {
        let hotel = Hotel::default();
        let bounds = Bounds::calculate(&hotel, &TimingAssumptions::default());

        let none = ProfitEstimate::estimate(0, &PriceMix::default(), &hotel, bounds.expenses);
        assert_eq!(none.verdict(&bounds), Verdict::BelowBounds);

        let too_many =
            ProfitEstimate::estimate(1_000, &PriceMix::default(), &hotel, bounds.expenses);
        assert_eq!(too_many.verdict(&bounds), Verdict::AboveBounds);
    }
}
