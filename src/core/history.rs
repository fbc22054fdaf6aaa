//! Historical price abstractions and symbol resolution for catalog funds

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize)]
pub enum HistoricalPeriod {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    #[default]
    FiveYears,
    TenYears,
    Max,
}

impl Display for HistoricalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.range())
    }
}

impl HistoricalPeriod {
    /// Range token understood by the chart API.
    pub fn range(&self) -> &'static str {
        match self {
            HistoricalPeriod::OneMonth => "1mo",
            HistoricalPeriod::ThreeMonths => "3mo",
            HistoricalPeriod::SixMonths => "6mo",
            HistoricalPeriod::OneYear => "1y",
            HistoricalPeriod::TwoYears => "2y",
            HistoricalPeriod::FiveYears => "5y",
            HistoricalPeriod::TenYears => "10y",
            HistoricalPeriod::Max => "max",
        }
    }

    /// Bar size: daily up to six months, weekly up to two years, monthly beyond.
    pub fn interval(&self) -> &'static str {
        match self {
            HistoricalPeriod::OneMonth
            | HistoricalPeriod::ThreeMonths
            | HistoricalPeriod::SixMonths => "1d",
            HistoricalPeriod::OneYear | HistoricalPeriod::TwoYears => "1wk",
            HistoricalPeriod::FiveYears | HistoricalPeriod::TenYears | HistoricalPeriod::Max => {
                "1mo"
            }
        }
    }

    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for HistoricalPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1mo" | "1m" => Ok(HistoricalPeriod::OneMonth),
            "3mo" | "3m" => Ok(HistoricalPeriod::ThreeMonths),
            "6mo" | "6m" => Ok(HistoricalPeriod::SixMonths),
            "1y" => Ok(HistoricalPeriod::OneYear),
            "2y" => Ok(HistoricalPeriod::TwoYears),
            "5y" => Ok(HistoricalPeriod::FiveYears),
            "10y" => Ok(HistoricalPeriod::TenYears),
            "max" => Ok(HistoricalPeriod::Max),
            _ => Err(anyhow::anyhow!("Invalid historical period: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub currency: String,
    pub points: Vec<PricePoint>,
}

/// The market data source answered but has no series for the symbol.
#[derive(Debug, Error)]
pub enum SymbolNotFound {
    #[error("HTTP error: {status} for symbol: {symbol}")]
    Status { status: String, symbol: String },
    #[error("No price data found for symbol: {0}")]
    NoData(String),
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn fetch_history(&self, symbol: &str, period: HistoricalPeriod) -> Result<PriceHistory>;
}

/// Exchange suffixes tried after the bare ISIN.
const EXCHANGE_SUFFIXES: [&str; 4] = ["MC", "MI", "DE", "PA"];

/// Ticker candidates for a fund, most specific first.
pub fn symbol_candidates(isin: &str, name: &str) -> Vec<String> {
    let mut candidates = vec![isin.to_string()];
    candidates.extend(EXCHANGE_SUFFIXES.iter().map(|s| format!("{isin}.{s}")));

    let slug = name.split_whitespace().collect::<Vec<_>>().join("-");
    if !slug.is_empty() {
        candidates.push(slug);
    }
    candidates
}

/// Returns the first non-empty history among the fund's ticker candidates.
///
/// `Ok(None)` means the source answered and knows none of them. When every
/// lookup failed without an answer, the last failure is returned.
pub async fn resolve_history(
    provider: &(dyn HistoryProvider + Send + Sync),
    isin: &str,
    name: &str,
    period: HistoricalPeriod,
) -> Result<Option<PriceHistory>> {
    let mut answered = false;
    let mut last_failure = None;

    for symbol in symbol_candidates(isin, name) {
        match provider.fetch_history(&symbol, period).await {
            Ok(history) if !history.points.is_empty() => return Ok(Some(history)),
            Ok(_) => {
                answered = true;
                debug!(%symbol, "No price points");
            }
            Err(e) if e.is::<SymbolNotFound>() => {
                answered = true;
                debug!(%symbol, error = %e, "Unknown symbol");
            }
            Err(e) => {
                debug!(%symbol, error = %e, "Symbol lookup failed");
                last_failure = Some(e);
            }
        }
    }

    match last_failure {
        Some(e) if !answered => Err(e.context(format!("No market data source answered for {isin}"))),
        _ => Ok(None),
    }
}
