use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::rewards::EPOCH_LENGTH_DAYS;
use crate::{EconomicParameters, FeeModel, ProjectionPoint};

/// ADA held in the reserve at the start of a projection.
pub const INITIAL_RESERVE: f64 = 14_000_000_000.0;

/// Epochs projected by default.
pub const DEFAULT_HORIZON_EPOCHS: u32 = 365;

/// Reserve and treasury balances between epochs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReserveState {
    pub reserve: f64,
    pub treasury: f64,
}

impl ReserveState {
    pub fn new(initial_reserve: f64) -> Self {
        Self {
            reserve: initial_reserve,
            treasury: 0.0,
        }
    }
}

/// Result of advancing one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochFlow {
    pub state: ReserveState,

    /// Rewards paid to stakers in the epoch.
    pub rewards: f64,
}

/// Trait for reserve depletion models.
///
/// Implementors define how one epoch moves ADA out of the reserve into the
/// treasury and the reward pot.
pub trait ReserveModel: Send + Sync + Clone + 'static {
    /// Advances the balances by one epoch.
    fn advance(&self, state: &ReserveState, params: &EconomicParameters) -> EpochFlow;
}

/// Default reserve model.
///
/// Each epoch the reserve shrinks by
/// \( \rho \eta (\tau + (1 - \tau) f_{rew} \theta) \). The expansion
/// \( \rho \eta R \) on the reduced reserve then feeds the treasury at rate
/// \( \tau \) and the reward pot at rate \( 1 - \tau \), with fees handled
/// according to the [`FeeModel`].
#[derive(Debug, Clone)]
pub struct CardanoReserve {
    /// Active stake ratio \( \eta \).
    eta: f64,

    /// Pool performance factor \( f_{rew} \).
    f_rew: f64,

    fee_model: FeeModel,
}

impl Default for CardanoReserve {
    fn default() -> Self {
        Self::new(FeeModel::default())
    }
}

impl CardanoReserve {
    /// Creates a model with \( \eta = f_{rew} = 1 \), i.e. without any
    /// stake-pool-level detail.
    pub fn new(fee_model: FeeModel) -> Self {
        Self {
            eta: 1.0,
            f_rew: 1.0,
            fee_model,
        }
    }

    pub fn fee_model(&self) -> FeeModel {
        self.fee_model
    }
}

impl ReserveModel for CardanoReserve {
    fn advance(&self, state: &ReserveState, params: &EconomicParameters) -> EpochFlow {
        let EconomicParameters {
            rho, tau, theta, fees, ..
        } = *params;

        let reduction = rho * self.eta * (tau + (1.0 - tau) * self.f_rew * theta);
        let reserve = state.reserve * (1.0 - reduction);
        let expansion = rho * self.eta * reserve;

        let (rewards, treasury_share) = match self.fee_model {
            FeeModel::Fractional => {
                let fees_amount = expansion * fees;
                ((expansion - fees_amount) * (1.0 - tau), tau * expansion)
            }
            FeeModel::Flat => {
                let pot = expansion + fees;
                (pot * (1.0 - tau), tau * pot)
            }
        };

        EpochFlow {
            state: ReserveState {
                reserve,
                treasury: state.treasury + treasury_share,
            },
            rewards,
        }
    }
}

/// Projects the default model from the standard initial reserve, starting
/// today.
pub fn project_series(
    params: &EconomicParameters,
    initial_reserve: f64,
    horizon_epochs: u32,
    fee_model: FeeModel,
) -> Vec<ProjectionPoint> {
    let today = chrono::Local::now().date_naive();
    project_series_with(
        &CardanoReserve::new(fee_model),
        params,
        initial_reserve,
        horizon_epochs,
        today,
    )
}

/// Runs `model` for `horizon_epochs` epochs.
///
/// Epochs are numbered from 1; epoch `n` is dated `start + (n - 1)` epoch
/// lengths. A zero horizon yields an empty series.
pub fn project_series_with<M: ReserveModel>(
    model: &M,
    params: &EconomicParameters,
    initial_reserve: f64,
    horizon_epochs: u32,
    start: NaiveDate,
) -> Vec<ProjectionPoint> {
    let mut state = ReserveState::new(initial_reserve);
    let mut series = Vec::with_capacity(horizon_epochs as usize);
    let step_days = EPOCH_LENGTH_DAYS as u64;

    for offset in 0..horizon_epochs {
        let flow = model.advance(&state, params);
        state = flow.state;
        let date = start
            .checked_add_days(Days::new(u64::from(offset) * step_days))
            .unwrap_or(NaiveDate::MAX);
        series.push(ProjectionPoint {
            epoch_index: offset + 1,
            date,
            reserve: state.reserve,
            treasury: state.treasury,
            rewards: flow.rewards,
        });
    }

    debug!(
        epochs = series.len(),
        final_reserve = state.reserve,
        final_treasury = state.treasury,
        "projected reserve"
    );
    series
}
