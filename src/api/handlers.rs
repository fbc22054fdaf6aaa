use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::error::ApiError;
use super::state::AppState;
use crate::core::history::resolve_history;
use crate::core::{
    Fund, FundPage, FundQuery, HistoricalPeriod, PriceHistory, QueryParams, load_funds, run_query,
};

const FUNDS_ERROR: &str = "Error fetching funds";

/// Decoded query string. Repeated keys are allowed and lookups take the
/// first value, so no query string is ever rejected.
type QueryPairs = Vec<(String, String)>;

fn first_value<'a>(pairs: &'a QueryPairs, key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn period_of(pairs: &QueryPairs) -> HistoricalPeriod {
    first_value(pairs, "period")
        .map(HistoricalPeriod::parse_or_default)
        .unwrap_or_default()
}

async fn find_fund(state: &AppState, isin: &str) -> Result<Fund, ApiError> {
    let funds = load_funds(state.data_path.as_path())
        .await
        .map_err(ApiError::internal(FUNDS_ERROR))?;
    let query = FundQuery {
        search: isin.to_string(),
        ..FundQuery::default()
    };
    funds
        .into_iter()
        .find(|fund| query.matches(fund))
        .ok_or(ApiError::NotFound("Fund not found"))
}

/// GET /api/funds
#[instrument(skip(state))]
pub async fn list_funds(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<FundPage>, ApiError> {
    let query = FundQuery::from_params(&QueryParams::from_pairs(pairs));
    let funds = load_funds(state.data_path.as_path())
        .await
        .map_err(ApiError::internal(FUNDS_ERROR))?;

    let page = run_query(&funds, &query);
    debug!(total = page.total, returned = page.funds.len(), "Query served");
    Ok(Json(page))
}

/// GET /api/funds/:isin
#[instrument(skip(state))]
pub async fn get_fund(
    State(state): State<AppState>,
    Path(isin): Path<String>,
) -> Result<Json<Fund>, ApiError> {
    find_fund(&state, &isin).await.map(Json)
}

/// GET /api/funds/:isin/history?period=5y
#[instrument(skip(state))]
pub async fn get_fund_history(
    State(state): State<AppState>,
    Path(isin): Path<String>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<PriceHistory>, ApiError> {
    let fund = find_fund(&state, &isin).await?;
    let period = period_of(&pairs);

    resolve_history(state.history.as_ref(), &fund.isin, &fund.name, period)
        .await
        .map_err(ApiError::internal("Failed to fetch historical data"))?
        .map(Json)
        .ok_or(ApiError::NotFound("No historical data found for this fund"))
}

/// GET /api/market-data?symbol=AAPL&period=5y
#[instrument(skip(state))]
pub async fn get_market_data(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<PriceHistory>, ApiError> {
    let symbol = first_value(&pairs, "symbol")
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::BadRequest("Symbol parameter is required"))?;
    let period = period_of(&pairs);

    state
        .history
        .fetch_history(symbol, period)
        .await
        .map(Json)
        .map_err(ApiError::internal("Failed to fetch market data"))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
