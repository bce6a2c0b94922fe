use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CompassError, ScoreVector};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn channels(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

impl FromStr for Rgb {
    type Err = CompassError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        let invalid = || CompassError::InvalidNumber(value.to_string());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| invalid());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Color endpoints for a score of -1 and +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRange {
    pub low: Rgb,
    pub high: Rgb,
}

pub const DECENTRALIZATION: ColorRange = ColorRange {
    low: Rgb(0xFF, 0x00, 0x00),
    high: Rgb(0x00, 0xFF, 0x00),
};
pub const SCALABILITY: ColorRange = ColorRange {
    low: Rgb(0x00, 0x00, 0xFF),
    high: Rgb(0xFF, 0xFF, 0x00),
};
pub const SECURITY: ColorRange = ColorRange {
    low: Rgb(0x00, 0xFF, 0xFF),
    high: Rgb(0xFF, 0x00, 0xFF),
};
pub const ADOPTION: ColorRange = ColorRange {
    low: Rgb(0xFF, 0xA5, 0x00),
    high: Rgb(0x80, 0x00, 0x80),
};

/// Maps a score onto its dimension's color range.
///
/// The mix weight is `(score + 1) / 2`, clamped to [0, 1] since raw scores
/// can leave the nominal [-1, 1] range. Channels are floored.
pub fn dimension_color(score: f64, range: ColorRange) -> Rgb {
    let weight = ((score + 1.0) / 2.0).clamp(0.0, 1.0);
    let [r, g, b] = mix_channels(range.low, range.high, weight);
    Rgb(r, g, b)
}

fn mix_channels(low: Rgb, high: Rgb, weight: f64) -> [u8; 3] {
    let mut out = [0u8; 3];
    for (slot, (a, b)) in out
        .iter_mut()
        .zip(low.channels().into_iter().zip(high.channels()))
    {
        let a = f64::from(a);
        *slot = (a + (f64::from(b) - a) * weight).floor() as u8;
    }
    out
}

/// Channel-wise floored average. An empty slice yields black.
pub fn blend(colors: &[Rgb]) -> Rgb {
    if colors.is_empty() {
        return Rgb(0, 0, 0);
    }
    let totals = colors.iter().fold([0u32; 3], |mut acc, color| {
        for (sum, channel) in acc.iter_mut().zip(color.channels()) {
            *sum += u32::from(channel);
        }
        acc
    });
    let n = colors.len() as u32;
    Rgb(
        (totals[0] / n) as u8,
        (totals[1] / n) as u8,
        (totals[2] / n) as u8,
    )
}

/// One dimension of the evaluation view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionResult {
    pub label: &'static str,
    pub score: f64,
    pub color: Rgb,

    /// Marker position on the gradient bar, in percent.
    pub position: f64,
}

/// Colors derived from a finished questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub dimensions: [DimensionResult; 4],
    pub overall: Rgb,
}

impl Evaluation {
    pub fn from_scores(scores: &ScoreVector) -> Self {
        let labels = ["Decentralization", "Scalability", "Security", "Adoption"];
        let ranges = [DECENTRALIZATION, SCALABILITY, SECURITY, ADOPTION];
        let components = scores.components();
        let dimensions: [DimensionResult; 4] = std::array::from_fn(|i| DimensionResult {
            label: labels[i],
            score: components[i],
            color: dimension_color(components[i], ranges[i]),
            position: (components[i] + 1.0) * 50.0,
        });
        let colors: Vec<Rgb> = dimensions.iter().map(|d| d.color).collect();
        Self {
            overall: blend(&colors),
            dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector4;

    #[test]
    fn neutral_score_sits_halfway() {
        // 0xFF * 0.5 = 127.5, floored
        assert_eq!(dimension_color(0.0, DECENTRALIZATION), Rgb(127, 127, 0));
        assert_eq!(dimension_color(-1.0, SCALABILITY), SCALABILITY.low);
        assert_eq!(dimension_color(1.0, SCALABILITY), SCALABILITY.high);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(dimension_color(1.3, SECURITY), SECURITY.high);
        assert_eq!(dimension_color(-4.0, ADOPTION), ADOPTION.low);
    }

    #[test]
    fn blend_floors_the_average() {
        let color = blend(&[Rgb(0, 0, 1), Rgb(0, 0, 0)]);
        assert_eq!(color, Rgb(0, 0, 0));
        assert_eq!(blend(&[Rgb(10, 20, 30), Rgb(20, 40, 60)]), Rgb(15, 30, 45));
    }

    #[test]
    fn hex_round_trip() {
        let color: Rgb = "#FFA500".parse().unwrap();
        assert_eq!(color, Rgb(255, 165, 0));
        assert_eq!(color.to_string(), "#ffa500");
        assert!("#12345".parse::<Rgb>().is_err());
    }

    #[test]
    fn evaluation_of_zero_scores() {
        let evaluation = Evaluation::from_scores(&Vector4::ZERO);
        assert!(evaluation.dimensions.iter().all(|d| d.position == 50.0));
        assert_eq!(evaluation.dimensions[0].color, Rgb(127, 127, 0));
        assert_eq!(evaluation.dimensions[1].color, Rgb(127, 127, 127));
        // (127 + 127 + 127 + 191) / 4, (127 + 127 + 127 + 82) / 4, (0 + 127 + 255 + 64) / 4
        assert_eq!(evaluation.overall, Rgb(143, 115, 111));
    }
}
