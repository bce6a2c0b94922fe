//! Dated price and market-cap history from a cached CoinGecko
//! `coins/cardano/market_chart?vs_currency=usd&days=90` response.
//!
//! The response carries `[timestamp_ms, value]` pairs; each becomes a
//! [`HistoryPoint`] on its UTC calendar date.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::price::{retry_async, RetryPolicy};
use crate::CompassError;

/// Days of history requested from the market-chart endpoint.
pub const HISTORY_DAYS: u32 = 90;

/// Which series of the market chart to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    #[default]
    Price,
    MarketCap,
}

impl FromStr for ChartKind {
    type Err = CompassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" | "prices" => Ok(ChartKind::Price),
            "market-cap" | "marketcap" | "market_cap" | "market_caps" => Ok(ChartKind::MarketCap),
            other => Err(CompassError::InvalidHistory(format!("unknown chart {other:?}"))),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Price => write!(f, "price"),
            ChartKind::MarketCap => write!(f, "market-cap"),
        }
    }
}

/// One dated sample, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Both series of a market chart, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub prices: Vec<HistoryPoint>,
    pub market_caps: Vec<HistoryPoint>,
}

#[derive(Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
    market_caps: Vec<(f64, f64)>,
}

impl HistoricalSeries {
    /// Parses a raw market-chart body. Fields other than `prices` and
    /// `market_caps` (such as `total_volumes`) are ignored.
    pub fn from_json(raw: &str) -> Result<Self, CompassError> {
        let chart: MarketChart = serde_json::from_str(raw)?;
        let series = Self {
            prices: dated(&chart.prices)?,
            market_caps: dated(&chart.market_caps)?,
        };
        debug!(
            prices = series.prices.len(),
            market_caps = series.market_caps.len(),
            "parsed market chart"
        );
        Ok(series)
    }

    pub fn select(&self, kind: ChartKind) -> &[HistoryPoint] {
        match kind {
            ChartKind::Price => &self.prices,
            ChartKind::MarketCap => &self.market_caps,
        }
    }
}

fn dated(pairs: &[(f64, f64)]) -> Result<Vec<HistoryPoint>, CompassError> {
    pairs
        .iter()
        .map(|&(millis, value)| {
            let date = millis
                .is_finite()
                .then(|| DateTime::from_timestamp_millis(millis as i64))
                .flatten()
                .ok_or_else(|| CompassError::InvalidHistory(format!("bad timestamp {millis}")))?
                .date_naive();
            Ok(HistoryPoint { date, value })
        })
        .collect()
}

/// Trait for sources of the market-chart history.
pub trait HistorySource: Send + Sync {
    fn fetch_chart(&self) -> Result<HistoricalSeries, CompassError>;
}

/// Reads a cached market-chart response from disk.
#[derive(Debug, Clone)]
pub struct FileHistorySource {
    path: PathBuf,
}

impl FileHistorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistorySource for FileHistorySource {
    fn fetch_chart(&self) -> Result<HistoricalSeries, CompassError> {
        let raw = std::fs::read_to_string(&self.path)?;
        HistoricalSeries::from_json(&raw)
    }
}

/// Resolves the history with retries, or `None` once every attempt failed.
pub async fn fetch_history<S: HistorySource>(
    source: &S,
    policy: &RetryPolicy,
) -> Option<HistoricalSeries> {
    match retry_async(policy, "fetch market chart", || async { source.fetch_chart() }).await {
        Ok(series) => Some(series),
        Err(err) => {
            warn!(error = %err, "market chart unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::time::Duration;

    const CHART: &str = r#"{
        "prices": [[1704067200000, 0.59], [1704153600000, 0.62], [1704240000000, 0.57]],
        "market_caps": [[1704067200000, 20800000000.0], [1704153600000, 21900000000.0], [1704240000000, 20100000000.0]],
        "total_volumes": [[1704067200000, 310000000.0]]
    }"#;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn reads_cached_market_chart() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{CHART}").unwrap();
        let policy = RetryPolicy {
            max_retries: 0,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
            jitter_factor: 0.0,
        };

        let series = fetch_history(&FileHistorySource::new(file.path()), &policy)
            .await
            .unwrap();
        let prices = series.select(ChartKind::Price);
        assert_eq!(prices.len(), 3);
        assert_eq!(prices[0], HistoryPoint { date: day(1), value: 0.59 });
        assert_eq!(prices[2].date, day(3));

        let caps = series.select(ChartKind::MarketCap);
        assert_eq!(caps[1], HistoryPoint { date: day(2), value: 21_900_000_000.0 });
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        let raw = r#"{"prices": [[1e300, 0.5]], "market_caps": []}"#;
        assert!(matches!(
            HistoricalSeries::from_json(raw),
            Err(CompassError::InvalidHistory(_))
        ));
    }

    #[test]
    fn missing_series_is_a_json_error() {
        let raw = r#"{"prices": [[1704067200000, 0.59]]}"#;
        assert!(matches!(HistoricalSeries::from_json(raw), Err(CompassError::Json(_))));
    }

    #[test]
    fn chart_kind_parses_both_spellings() {
        assert_eq!("price".parse::<ChartKind>().unwrap(), ChartKind::Price);
        assert_eq!("Market-Cap".parse::<ChartKind>().unwrap(), ChartKind::MarketCap);
        assert_eq!("marketcap".parse::<ChartKind>().unwrap(), ChartKind::MarketCap);
        assert!(matches!(
            "volume".parse::<ChartKind>(),
            Err(CompassError::InvalidHistory(_))
        ));
        assert_eq!(ChartKind::MarketCap.to_string(), "market-cap");
    }
}
