//! Cardano Compass: a Rust library for exploring Cardano's reward and monetary-policy model.
//! It scores attitudes toward the blockchain trilemma plus adoption, estimates staking rewards
//! under adjustable monetary parameters, and projects how the reserve drains into the treasury
//! and the reward pot. The model is simplified and illustrative; it does not reproduce the
//! on-chain reward formula.
//!
//! # Features
//! - Questionnaire scoring over four dimensions, incrementally or in one fold.
//! - Staking reward bands over a day, an epoch, a month and a year.
//! - Multi-epoch reserve/treasury/reward projections with flat or fractional fees.
//! - Scenario presets, locale-aware parameter input and evaluation colors.
//! - Dated price and market-cap history from a cached market chart.
//!
//! # Example
//! ```
//! use cardano_compass::{
//!     estimate_rewards, project_series, EconomicParameters, FeeModel, Scenario,
//! };
//!
//! let params = Scenario::Positive.apply(&EconomicParameters::default());
//! let estimate = estimate_rewards(&params, Some(0.40)).expect("price is known");
//! assert!(estimate.year.min <= estimate.year.max);
//!
//! let series = project_series(&params, 14_000_000_000.0, 73, FeeModel::Fractional);
//! assert_eq!(series.len(), 73);
//! assert!(series[72].reserve < series[0].reserve);
//! ```

pub mod config;
mod error;
pub mod flow;
pub mod history;
pub mod locale;
pub mod palette;
pub mod price;
mod projection;
mod questionnaire;
mod rewards;
mod scenario;
pub mod telemetry;
mod types;

pub use error::CompassError;
pub use projection::{
    project_series, project_series_with, CardanoReserve, EpochFlow, ReserveModel, ReserveState,
    DEFAULT_HORIZON_EPOCHS, INITIAL_RESERVE,
};
pub use questionnaire::{
    apply_answer, next_unanswered, parse_answer, score_all, weights, NextStep, Question,
    Questionnaire, QUESTIONS,
};
pub use rewards::{
    estimate_rewards, estimate_rewards_with, RewardModel, TreasuryAdjusted, EPOCH_LENGTH_DAYS,
    FLUCTUATION,
};
pub use scenario::{apply_scenario_preset, Scenario};
pub use types::{
    Answer, Band, EconomicParameters, FeeModel, ProjectionPoint, RewardEstimate, ScoreVector,
    Vector4,
};
