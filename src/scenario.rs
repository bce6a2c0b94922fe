use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CompassError, EconomicParameters};

/// Preset bundles for the projection simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Positive,
    Neutral,
    Negative,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Positive, Scenario::Neutral, Scenario::Negative];

    /// (rho, tau, theta, fees) of the preset.
    pub fn values(self) -> (f64, f64, f64, f64) {
        match self {
            Scenario::Positive => (0.005, 0.15, 0.9, 0.07),
            Scenario::Neutral => (0.003, 0.2, 0.8, 0.05),
            Scenario::Negative => (0.002, 0.25, 0.7, 0.03),
        }
    }

    /// Replaces rho, tau, theta and fees of `base`; the stake is kept.
    pub fn apply(self, base: &EconomicParameters) -> EconomicParameters {
        let (rho, tau, theta, fees) = self.values();
        EconomicParameters {
            rho,
            tau,
            theta,
            fees,
            ..*base
        }
    }
}

impl FromStr for Scenario {
    type Err = CompassError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Scenario::Positive),
            "neutral" => Ok(Scenario::Neutral),
            "negative" => Ok(Scenario::Negative),
            _ => Err(CompassError::UnknownScenario(value.to_string())),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scenario::Positive => "positive",
            Scenario::Neutral => "neutral",
            Scenario::Negative => "negative",
        };
        f.write_str(name)
    }
}

/// Parameters of the named preset applied to the defaults.
///
/// # Errors
/// Returns an error if `name` is not one of the presets.
pub fn apply_scenario_preset(name: &str) -> Result<EconomicParameters, CompassError> {
    let scenario: Scenario = name.parse()?;
    Ok(scenario.apply(&EconomicParameters::default()))
}
