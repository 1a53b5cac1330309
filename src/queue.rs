//! Steady-state M/M/c estimates for each hotel resource.

use std::fmt::{self, Display};

use tracing::{debug, warn};

use crate::error::{ModelError, ModelResult};

/// Utilisation above which a resource is reported as congested.
pub const HIGH_UTILISATION: f64 = 0.85;

/// A hotel resource modelled as a multi-server queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Front desk check-in.
    Reception,
    /// Porters escorting guests to their room.
    PorterIn,
    /// Standard rooms, one channel per room.
    StandardRooms,
    /// Premium rooms, one channel per room.
    PremiumRooms,
    /// Porters escorting guests out after checkout.
    PorterOut,
    /// Room cleaning after checkout.
    Housekeeping,
}

impl Resource {
    /// Every resource, in the order a guest meets them.
    pub const ALL: [Resource; 6] = [
        Resource::Reception,
        Resource::PorterIn,
        Resource::StandardRooms,
        Resource::PremiumRooms,
        Resource::PorterOut,
        Resource::Housekeeping,
    ];
}

impl Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Reception => "reception",
            Resource::PorterIn => "porter (in)",
            Resource::StandardRooms => "standard rooms",
            Resource::PremiumRooms => "premium rooms",
            Resource::PorterOut => "porter (out)",
            Resource::Housekeeping => "housekeeping",
        })
    }
}

/// Steady-state congestion metrics for one resource.
///
/// Computed once from sampled means and never updated. Rates are per minute, times are in
/// minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueSnapshot {
    /// The resource being modelled.
    pub resource: Resource,
    /// Arrival rate λ.
    pub arrival_rate: f64,
    /// Service rate μ of a single channel.
    pub service_rate: f64,
    /// Number of identical servers c.
    pub channels: usize,
    /// Utilisation ρ = λ / (cμ).
    pub rho: f64,
    /// Erlang-C probability that an arrival has to wait.
    pub prob_wait: f64,
    /// Mean number in the system.
    pub l: f64,
    /// Mean number waiting.
    pub lq: f64,
    /// Mean time in the system.
    pub w: f64,
    /// Mean time waiting.
    pub wq: f64,
}

impl QueueSnapshot {
    /// Estimate the steady state of an M/M/c queue.
    ///
    /// Fails rather than returning negative or undefined metrics when the inputs are invalid or
    /// the queue has no steady state (`ρ >= 1`).
    pub fn estimate(
        resource: Resource,
        arrival_rate: f64,
        service_rate: f64,
        channels: usize,
    ) -> ModelResult<Self> {
        if !arrival_rate.is_finite() || arrival_rate < 0.0 {
            return Err(ModelError::InvalidRate {
                resource,
                name: "arrival rate",
                value: arrival_rate,
            });
        }
        if !service_rate.is_finite() || service_rate <= 0.0 {
            return Err(ModelError::InvalidRate {
                resource,
                name: "service rate",
                value: service_rate,
            });
        }
        if channels == 0 {
            return Err(ModelError::NoChannels { resource });
        }

        let offered_load = arrival_rate / service_rate;
        let c = channels as f64;
        let rho = offered_load / c;
        if rho >= 1.0 {
            return Err(ModelError::Unstable { resource, rho });
        }

        // Σ a^n/n! for n < c, carrying the term forward so large room counts can't overflow.
        let mut term = 1.0;
        let mut partial_sum = 0.0;
        for n in 0..channels {
            if n > 0 {
                term *= offered_load / n as f64;
            }
            partial_sum += term;
        }
        // a^c / c!
        let last_term = term * offered_load / c;
        let tail = last_term / (1.0 - rho);

        let p0 = 1.0 / (partial_sum + tail);
        let prob_wait = p0 * tail;
        let lq = prob_wait * rho / (1.0 - rho);
        let l = lq + offered_load;

        // An idle resource never queues.
        let wq = if arrival_rate > 0.0 {
            lq / arrival_rate
        } else {
            0.0
        };
        let w = wq + 1.0 / service_rate;

        let snapshot = Self {
            resource,
            arrival_rate,
            service_rate,
            channels,
            rho,
            prob_wait,
            l,
            lq,
            w,
            wq,
        };

        debug!(
            resource = %resource,
            lambda = arrival_rate,
            mu = service_rate,
            channels,
            rho,
            l,
            lq,
            w,
            wq,
            "queue snapshot"
        );
        if rho > HIGH_UTILISATION {
            warn!(resource = %resource, rho, "resource close to saturation");
        }

        Ok(snapshot)
    }

    /// Mean number of busy servers, `λ/μ`.
    pub fn offered_load(&self) -> f64 {
        self.arrival_rate / self.service_rate
    }

    /// Mean service time of one channel, `1/μ`.
    pub fn mean_service_time(&self) -> f64 {
        1.0 / self.service_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn mm1_matches_closed_form() {
        // λ = 0.5, μ = 1 => ρ = 0.5, Lq = ρ²/(1-ρ) = 0.5, L = ρ/(1-ρ) = 1
        let q = QueueSnapshot::estimate(Resource::Reception, 0.5, 1.0, 1).unwrap();

        assert_close(q.rho, 0.5);
        assert_close(q.prob_wait, 0.5);
        assert_close(q.lq, 0.5);
        assert_close(q.l, 1.0);
        assert_close(q.wq, 1.0);
        assert_close(q.w, 2.0);
    }

    #[test]
    fn mm2_matches_erlang_c() {
        // λ = 1, μ = 1, c = 2 => P0 = 1/3, Lq = 1/3
        let q = QueueSnapshot::estimate(Resource::PorterIn, 1.0, 1.0, 2).unwrap();

        assert_close(q.rho, 0.5);
        assert_close(q.prob_wait, 1.0 / 3.0);
        assert_close(q.lq, 1.0 / 3.0);
        assert_close(q.l, 4.0 / 3.0);
    }

    #[test]
    fn little_identities_hold() {
        let cases = [
            (0.05, 0.25, 2),
            (0.06, 1.0 / 6.5, 2),
            (0.053, 1.0 / 480.0, 34),
            (0.0093, 1.0 / 480.0, 6),
            (0.062, 1.0 / 31.9, 3),
            (9.9, 0.1, 100),
        ];

        for (lambda, mu, c) in cases {
            let q = QueueSnapshot::estimate(Resource::StandardRooms, lambda, mu, c).unwrap();

            assert_close(q.rho, lambda / (c as f64 * mu));
            assert!(((q.l - q.lq) - lambda / mu).abs() < 1e-9 * (lambda / mu).max(1.0));
            assert!((q.l - lambda * q.w).abs() < 1e-6 * q.l.max(1.0));
            assert!(q.lq >= 0.0);
            assert!((0.0..=1.0).contains(&q.prob_wait));
        }
    }

    #[test]
    fn many_channels_do_not_overflow() {
        let q = QueueSnapshot::estimate(Resource::StandardRooms, 250.0, 1.0, 300).unwrap();

        assert!(q.l.is_finite());
        assert!(q.lq.is_finite());
        assert!(q.prob_wait < 0.01);
    }

    #[test]
    fn idle_resource_has_no_queue() {
        let q = QueueSnapshot::estimate(Resource::PremiumRooms, 0.0, 0.5, 3).unwrap();

        assert_eq!(q.rho, 0.0);
        assert_eq!(q.lq, 0.0);
        assert_eq!(q.wq, 0.0);
        assert_close(q.w, 2.0);
    }

    #[test]
    fn saturated_queue_is_unstable() {
        let err = QueueSnapshot::estimate(Resource::Housekeeping, 3.0, 1.0, 3).unwrap_err();

        assert!(matches!(
            err,
            ModelError::Unstable {
                resource: Resource::Housekeeping,
                ..
            }
        ));

        let err = QueueSnapshot::estimate(Resource::Housekeeping, 5.0, 1.0, 3).unwrap_err();
        match err {
            ModelError::Unstable { rho, .. } => assert!(rho > 1.0),
            other => panic!("expected unstable, got {other:?}"),
        }
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(matches!(
            QueueSnapshot::estimate(Resource::Reception, -1.0, 1.0, 1),
            Err(ModelError::InvalidRate {
                name: "arrival rate",
                ..
            })
        ));
        assert!(matches!(
            QueueSnapshot::estimate(Resource::Reception, 1.0, 0.0, 1),
            Err(ModelError::InvalidRate {
                name: "service rate",
                ..
            })
        ));
        assert!(matches!(
            QueueSnapshot::estimate(Resource::Reception, f64::NAN, 1.0, 1),
            Err(ModelError::InvalidRate { .. })
        ));
        assert!(matches!(
            QueueSnapshot::estimate(Resource::Reception, 1.0, 2.0, 0),
            Err(ModelError::NoChannels { .. })
        ));
    }
}
