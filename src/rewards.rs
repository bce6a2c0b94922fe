use tracing::debug;

use crate::{Band, EconomicParameters, RewardEstimate};

/// Relative spread applied to rho, tau and theta for the estimate band.
pub const FLUCTUATION: f64 = 0.1;

/// Days per epoch.
pub const EPOCH_LENGTH_DAYS: f64 = 5.0;

const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Trait for staking reward models.
///
/// Implementors turn the monetary parameters into a daily reward for a
/// stake. Estimates rely on the reward being non-decreasing in `rho` and
/// `theta` and non-increasing in `tau`.
pub trait RewardModel: Send + Sync + Clone + 'static {
    /// Daily reward in ADA for `stake` under the given parameters.
    fn daily_reward(&self, rho: f64, tau: f64, theta: f64, stake: f64) -> f64;
}

/// Default reward model.
///
/// An epoch pays \( stake \cdot \rho \cdot (1 - \tau) \cdot \theta \), spread
/// evenly over the days of the epoch.
#[derive(Debug, Clone)]
pub struct TreasuryAdjusted {
    epoch_length_days: f64,
}

impl Default for TreasuryAdjusted {
    fn default() -> Self {
        Self {
            epoch_length_days: EPOCH_LENGTH_DAYS,
        }
    }
}

impl RewardModel for TreasuryAdjusted {
    fn daily_reward(&self, rho: f64, tau: f64, theta: f64, stake: f64) -> f64 {
        stake * rho * (1.0 - tau) * theta / self.epoch_length_days
    }
}

/// Estimates staking rewards with the default model.
///
/// Returns `None` when the live price is unknown.
pub fn estimate_rewards(
    params: &EconomicParameters,
    live_price: Option<f64>,
) -> Option<RewardEstimate> {
    estimate_rewards_with(&TreasuryAdjusted::default(), params, live_price)
}

/// Estimates staking rewards over a day, an epoch, a month and a year.
///
/// Each of rho, tau and theta is widened by [`FLUCTUATION`]. The lower bound
/// takes the unfavorable end of every parameter (low rho, high tau, low
/// theta) and the upper bound the favorable end. Longer horizons scale the
/// daily band linearly.
pub fn estimate_rewards_with<M: RewardModel>(
    model: &M,
    params: &EconomicParameters,
    live_price: Option<f64>,
) -> Option<RewardEstimate> {
    let price = live_price?;
    let (min_rho, max_rho) = spread(params.rho);
    let (min_tau, max_tau) = spread(params.tau);
    let (min_theta, max_theta) = spread(params.theta);

    let day = Band {
        min: model.daily_reward(min_rho, max_tau, min_theta, params.stake_amount),
        max: model.daily_reward(max_rho, min_tau, max_theta, params.stake_amount),
    };
    debug!(?params, price, ?day, "estimated daily rewards");

    Some(RewardEstimate {
        day,
        epoch: day.scale(EPOCH_LENGTH_DAYS),
        month: day.scale(DAYS_PER_MONTH),
        year: day.scale(DAYS_PER_YEAR),
        price,
    })
}

fn spread(value: f64) -> (f64, f64) {
    (value * (1.0 - FLUCTUATION), value * (1.0 + FLUCTUATION))
}
