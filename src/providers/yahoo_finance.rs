use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::cache::Cache;
use crate::core::history::{
    HistoricalPeriod, HistoryProvider, PriceHistory, PricePoint, SymbolNotFound,
};
use crate::providers::util::with_retry;

pub type HistoryCache = Cache<(String, HistoricalPeriod), PriceHistory>;

// Transport retries for a single chart request
const RETRIES: usize = 3;
const RETRY_DELAY_MS: u64 = 500;

pub struct YahooHistoryProvider {
    base_url: String,
    cache: Arc<HistoryCache>,
}

impl YahooHistoryProvider {
    pub fn new(base_url: &str, cache: Arc<HistoryCache>) -> Self {
        YahooHistoryProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    #[serde(default)]
    currency: Option<String>,
}

fn extract_points(item: &ChartItem) -> Vec<PricePoint> {
    let (Some(timestamps), Some(closes)) = (
        item.timestamp.as_ref(),
        item.indicators
            .as_ref()
            .and_then(|inds| inds.quote.first())
            .and_then(|q| q.close.as_ref()),
    ) else {
        return Vec::new();
    };

    timestamps
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = (*close)?;
            let date = Utc.timestamp_opt(*ts, 0).single()?.date_naive();
            Some(PricePoint { date, close })
        })
        .collect()
}

#[async_trait]
impl HistoryProvider for YahooHistoryProvider {
    #[instrument(
        name = "YahooHistoryFetch",
        skip(self),
        fields(symbol = %symbol, period = %period)
    )]
    async fn fetch_history(&self, symbol: &str, period: HistoricalPeriod) -> Result<PriceHistory> {
        let key = (symbol.to_string(), period);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url,
            urlencoding::encode(symbol),
            period.range(),
            period.interval()
        );
        debug!("Requesting price history from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fundscope/0.1")
            .build()?;
        let response = with_retry(|| client.get(&url).send(), RETRIES, RETRY_DELAY_MS)
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SymbolNotFound::Status {
                status: response.status().to_string(),
                symbol: symbol.to_string(),
            }
            .into());
        }
        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let item = data
            .chart
            .result
            .as_deref()
            .and_then(|items| items.first())
            .ok_or_else(|| SymbolNotFound::NoData(symbol.to_string()))?;

        let history = PriceHistory {
            symbol: symbol.to_string(),
            currency: item.meta.currency.clone().unwrap_or_default(),
            points: extract_points(item),
        };

        self.cache.put(key, history.clone()).await;
        Ok(history)
    }
}
