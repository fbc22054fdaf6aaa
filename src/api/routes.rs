use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use super::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // The catalog UI is served from elsewhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Catalog endpoints
        .route("/api/funds", get(handlers::list_funds))
        .route("/api/funds/:isin", get(handlers::get_fund))
        .route("/api/funds/:isin/history", get(handlers::get_fund_history))
        // Market data passthrough
        .route("/api/market-data", get(handlers::get_market_data))
        .with_state(state)
        .layer(cors)
}
