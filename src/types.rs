use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CompassError;

/// A point in the four attitude dimensions.
///
/// Used both for question weights and for accumulated scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector4 {
    /// Preference for distributed control over central authority.
    pub decentralization: f64,

    /// Preference for throughput and transaction speed.
    pub scalability: f64,

    /// Weight placed on transaction security and privacy.
    pub security: f64,

    /// Weight placed on user adoption and accessibility.
    pub adoption: f64,
}

/// Accumulated questionnaire result.
pub type ScoreVector = Vector4;

impl Vector4 {
    pub const ZERO: Vector4 = Vector4::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(decentralization: f64, scalability: f64, security: f64, adoption: f64) -> Self {
        Self {
            decentralization,
            scalability,
            security,
            adoption,
        }
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Vector4) -> Vector4 {
        Vector4::new(
            self.decentralization + other.decentralization,
            self.scalability + other.scalability,
            self.security + other.security,
            self.adoption + other.adoption,
        )
    }

    /// Component-wise difference.
    pub fn sub(&self, other: &Vector4) -> Vector4 {
        Vector4::new(
            self.decentralization - other.decentralization,
            self.scalability - other.scalability,
            self.security - other.security,
            self.adoption - other.adoption,
        )
    }

    pub fn scale(&self, factor: f64) -> Vector4 {
        Vector4::new(
            self.decentralization * factor,
            self.scalability * factor,
            self.security * factor,
            self.adoption * factor,
        )
    }

    /// Components in display order.
    pub fn components(&self) -> [f64; 4] {
        [
            self.decentralization,
            self.scalability,
            self.security,
            self.adoption,
        ]
    }
}

/// A recorded answer. A skipped or unanswered question is `None` in an
/// `Option<Answer>` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Agree,
    Neutral,
    Disagree,
}

impl Answer {
    /// Direction in which the question weight is applied.
    pub fn sign(self) -> f64 {
        match self {
            Answer::Agree => 1.0,
            Answer::Neutral => 0.0,
            Answer::Disagree => -1.0,
        }
    }
}

/// Economic inputs of the simulators.
///
/// Expected domains are rho in [0, 0.01], tau and theta in [0, 1], and
/// non-negative stake and fees. The engines do not enforce them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicParameters {
    /// Monetary expansion rate \( \rho \).
    pub rho: f64,

    /// Treasury ratio \( \tau \).
    pub tau: f64,

    /// Participation rate \( \theta \).
    pub theta: f64,

    /// Stake in ADA.
    pub stake_amount: f64,

    /// Fee fraction of the epoch rewards, or a flat amount per epoch,
    /// depending on the [`FeeModel`].
    pub fees: f64,
}

impl Default for EconomicParameters {
    fn default() -> Self {
        Self {
            rho: 0.003,
            tau: 0.2,
            theta: 0.8,
            stake_amount: 100.0,
            fees: 0.05,
        }
    }
}

/// A min/max range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Lower end, from the least favorable parameter combination.
    pub min: f64,

    /// Upper end, from the most favorable parameter combination.
    pub max: f64,
}

impl Band {
    pub fn scale(&self, factor: f64) -> Band {
        Band {
            min: self.min * factor,
            max: self.max * factor,
        }
    }
}

/// Staking reward ranges over four horizons, in ADA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardEstimate {
    pub day: Band,
    pub epoch: Band,
    pub month: Band,
    pub year: Band,

    /// Live price the estimate was computed against (USD per ADA).
    pub price: f64,
}

impl RewardEstimate {
    /// The same ranges converted to USD.
    pub fn in_fiat(&self) -> RewardEstimate {
        RewardEstimate {
            day: self.day.scale(self.price),
            epoch: self.epoch.scale(self.price),
            month: self.month.scale(self.price),
            year: self.year.scale(self.price),
            price: self.price,
        }
    }

    /// Horizons with their labels, in display order.
    pub fn horizons(&self) -> [(&'static str, Band); 4] {
        [
            ("1 Day", self.day),
            ("1 Epoch (5 Days)", self.epoch),
            ("1 Month", self.month),
            ("1 Year", self.year),
        ]
    }
}

/// One projected epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 1-based epoch number.
    pub epoch_index: u32,

    /// Calendar date of the epoch, five days after the previous one.
    pub date: NaiveDate,

    /// Reserve left after this epoch's expansion, in ADA.
    pub reserve: f64,

    /// Cumulative treasury balance, in ADA.
    pub treasury: f64,

    /// Reward pot distributed in this epoch, in ADA.
    pub rewards: f64,
}

/// How the `fees` parameter enters the reward pot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeModel {
    /// `fees` is a fraction deducted from the epoch's expansion.
    #[default]
    Fractional,

    /// `fees` is an absolute amount added to the pot every epoch.
    Flat,
}

impl FromStr for FeeModel {
    type Err = CompassError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fractional" | "fraction" => Ok(FeeModel::Fractional),
            "flat" => Ok(FeeModel::Flat),
            other => Err(CompassError::UnknownFeeModel(other.to_string())),
        }
    }
}

impl fmt::Display for FeeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeModel::Fractional => write!(f, "fractional"),
            FeeModel::Flat => write!(f, "flat"),
        }
    }
}
