//! Hotel parameters shared by the analytic bounds and the queueing model.

use std::fmt::{self, Display};

use bon::bon;

use crate::error::{ModelError, ModelResult};

/// Length of the simulated operating day, in minutes.
pub const DAY_MINUTES: f64 = 1440.0;

/// Rooms, prices, staffing and wages for a hotel.
///
/// Staffing numbers are per shift and double as the channel counts of the queueing model.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Hotel {
    pub(crate) standard_rooms: usize,
    pub(crate) premium_rooms: usize,
    pub(crate) standard_price: f64,
    pub(crate) premium_price: f64,
    pub(crate) receptionists: usize,
    pub(crate) porters: usize,
    pub(crate) housekeepers: usize,
    pub(crate) receptionist_wage: f64,
    pub(crate) porter_wage: f64,
    pub(crate) housekeeper_wage: f64,
    pub(crate) shifts: usize,
    pub(crate) shift_hours: f64,
    pub(crate) room_overhead: f64,
}

#[bon]
impl Hotel {
    #[allow(missing_docs)]
    #[builder]
    pub fn new(
        /// Number of standard rooms.
        #[builder(default = 34)]
        standard_rooms: usize,
        /// Number of premium rooms.
        #[builder(default = 6)]
        premium_rooms: usize,
        /// Price of one standard stay.
        #[builder(default = 120.0)]
        standard_price: f64,
        /// Price of one premium stay.
        #[builder(default = 250.0)]
        premium_price: f64,
        /// Receptionists on each shift.
        #[builder(default = 2)]
        receptionists: usize,
        /// Porters on each shift.
        #[builder(default = 2)]
        porters: usize,
        /// Housekeepers on each shift.
        #[builder(default = 3)]
        housekeepers: usize,
        /// Hourly wage of a receptionist.
        #[builder(default = 18.0)]
        receptionist_wage: f64,
        /// Hourly wage of a porter.
        #[builder(default = 15.0)]
        porter_wage: f64,
        /// Hourly wage of a housekeeper.
        #[builder(default = 16.0)]
        housekeeper_wage: f64,
        /// Shifts worked per day.
        #[builder(default = 3)]
        shifts: usize,
        /// Length of a shift in hours.
        #[builder(default = 8.0)]
        shift_hours: f64,
        /// Fixed daily running cost of each room.
        #[builder(default = 25.0)]
        room_overhead: f64,
    ) -> Self {
        Self {
            standard_rooms,
            premium_rooms,
            standard_price,
            premium_price,
            receptionists,
            porters,
            housekeepers,
            receptionist_wage,
            porter_wage,
            housekeeper_wage,
            shifts,
            shift_hours,
            room_overhead,
        }
    }

    /// Standard plus premium rooms.
    pub fn total_rooms(&self) -> usize {
        self.standard_rooms + self.premium_rooms
    }

    /// Number of standard rooms.
    pub fn standard_rooms(&self) -> usize {
        self.standard_rooms
    }

    /// Number of premium rooms.
    pub fn premium_rooms(&self) -> usize {
        self.premium_rooms
    }

    /// Price of one standard stay.
    pub fn standard_price(&self) -> f64 {
        self.standard_price
    }

    /// Price of one premium stay.
    pub fn premium_price(&self) -> f64 {
        self.premium_price
    }

    /// Receptionists on each shift.
    pub fn receptionists(&self) -> usize {
        self.receptionists
    }

    /// Porters on each shift.
    pub fn porters(&self) -> usize {
        self.porters
    }

    /// Housekeepers on each shift.
    pub fn housekeepers(&self) -> usize {
        self.housekeepers
    }

    pub(crate) fn validate(&self) -> ModelResult<()> {
        let money = [
            ("standard price", self.standard_price),
            ("premium price", self.premium_price),
            ("receptionist wage", self.receptionist_wage),
            ("porter wage", self.porter_wage),
            ("housekeeper wage", self.housekeeper_wage),
            ("shift hours", self.shift_hours),
            ("room overhead", self.room_overhead),
        ];
        for (name, value) in money {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.total_rooms() == 0 {
            return Err(ModelError::InvalidConfig(
                "hotel must have at least one room".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Hotel {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for Hotel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rooms: {} standard @ {:.2} + {} premium @ {:.2}, ",
            self.standard_rooms, self.standard_price, self.premium_rooms, self.premium_price
        )?;
        write!(
            f,
            "staff per shift: {} reception, {} porters, {} housekeeping, {} x {}h shifts",
            self.receptionists, self.porters, self.housekeepers, self.shifts, self.shift_hours
        )
    }
}

/// Best-case and worst-case timing used to bound room turnover.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct TimingAssumptions {
    pub(crate) horizon: f64,
    pub(crate) min_stay: f64,
    pub(crate) max_stay: f64,
    pub(crate) min_cleaning: f64,
    pub(crate) max_cleaning: f64,
}

#[bon]
impl TimingAssumptions {
    #[allow(missing_docs)]
    #[builder]
    pub fn new(
        /// Length of the simulated period in minutes.
        #[builder(default = DAY_MINUTES)]
        horizon: f64,
        /// Shortest stay in minutes.
        #[builder(default = 240.0)]
        min_stay: f64,
        /// Longest stay in minutes.
        #[builder(default = 720.0)]
        max_stay: f64,
        /// Fastest room cleaning in minutes.
        #[builder(default = 20.0)]
        min_cleaning: f64,
        /// Slowest room cleaning in minutes.
        #[builder(default = 60.0)]
        max_cleaning: f64,
    ) -> Self {
        Self {
            horizon,
            min_stay,
            max_stay,
            min_cleaning,
            max_cleaning,
        }
    }

    /// Length of the simulated period in minutes.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Quickest time to turn a room round: shortest stay plus fastest cleaning.
    pub fn best_turnaround(&self) -> f64 {
        self.min_stay + self.min_cleaning
    }

    /// Slowest time to turn a room round: longest stay plus slowest cleaning.
    pub fn worst_turnaround(&self) -> f64 {
        self.max_stay + self.max_cleaning
    }

    pub(crate) fn validate(&self) -> ModelResult<()> {
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "horizon must be positive, got {}",
                self.horizon
            )));
        }
        if !(self.min_stay > 0.0 && self.min_stay <= self.max_stay) {
            return Err(ModelError::InvalidConfig(format!(
                "stay bounds must satisfy 0 < min <= max, got {}..{}",
                self.min_stay, self.max_stay
            )));
        }
        if !(self.min_cleaning >= 0.0 && self.min_cleaning <= self.max_cleaning) {
            return Err(ModelError::InvalidConfig(format!(
                "cleaning bounds must satisfy 0 <= min <= max, got {}..{}",
                self.min_cleaning, self.max_cleaning
            )));
        }
        if !self.worst_turnaround().is_finite() {
            return Err(ModelError::InvalidConfig(
                "turnaround times must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TimingAssumptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for TimingAssumptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "horizon: {} min, stay: {}..{} min, cleaning: {}..{} min",
            self.horizon, self.min_stay, self.max_stay, self.min_cleaning, self.max_cleaning
        )
    }
}

/// Split of guests between standard and premium rooms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceMix {
    standard_share: f64,
}

impl PriceMix {
    /// A mix where `standard_share` of guests take standard rooms and the rest premium.
    pub fn new(standard_share: f64) -> ModelResult<Self> {
        if !(0.0..=1.0).contains(&standard_share) {
            return Err(ModelError::InvalidConfig(format!(
                "standard share must be within [0, 1], got {standard_share}"
            )));
        }
        Ok(Self { standard_share })
    }

    /// Fraction of guests in standard rooms.
    pub fn standard_share(&self) -> f64 {
        self.standard_share
    }

    /// Fraction of guests in premium rooms.
    pub fn premium_share(&self) -> f64 {
        1.0 - self.standard_share
    }

    /// Average price paid per guest under this mix.
    pub fn blended_price(&self, hotel: &Hotel) -> f64 {
        self.standard_share * hotel.standard_price + self.premium_share() * hotel.premium_price
    }
}

impl Default for PriceMix {
    fn default() -> Self {
        Self {
            standard_share: 0.85,
        }
    }
}

impl Display for PriceMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0}% standard / {:.0}% premium",
            self.standard_share * 100.0,
            self.premium_share() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Hotel::default().validate().unwrap();
        TimingAssumptions::default().validate().unwrap();
        assert_eq!(Hotel::default().total_rooms(), 40);
    }

    #[test]
    fn builder_overrides_defaults() {
        let hotel = Hotel::builder().premium_rooms(10).porters(4).build();

        assert_eq!(hotel.premium_rooms(), 10);
        assert_eq!(hotel.porters(), 4);
        assert_eq!(hotel.standard_rooms(), 34);
    }

    #[test]
    fn roomless_hotel_is_rejected() {
        let hotel = Hotel::builder().standard_rooms(0).premium_rooms(0).build();

        assert!(matches!(
            hotel.validate(),
            Err(ModelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn inverted_stay_bounds_are_rejected() {
        let timing = TimingAssumptions::builder()
            .min_stay(800.0)
            .max_stay(700.0)
            .build();

        assert!(timing.validate().is_err());
    }

    #[test]
    fn price_mix_must_be_a_fraction() {
        assert!(PriceMix::new(1.2).is_err());
        assert!(PriceMix::new(-0.1).is_err());
        assert!(PriceMix::new(f64::NAN).is_err());

        let mix = PriceMix::new(0.5).unwrap();
        let hotel = Hotel::default();
        assert_eq!(mix.blended_price(&hotel), 185.0);
    }

    #[test]
    fn display_describes_mix() {
        assert_eq!(PriceMix::default().to_string(), "85% standard / 15% premium");
    }
}
