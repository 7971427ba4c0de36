use axum::{
    extract::{Query, State},
    Extension, Json,
};
use buywise_memory::MemoryEntry;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_memory_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct AnalysisItem {
    product_id: String,
    title: String,
    site: String,
    url: String,
    timestamp: NaiveDateTime,
    overall_sentiment: String,
    confidence_score: f64,
    review_count: u32,
}

impl From<MemoryEntry> for AnalysisItem {
    fn from(entry: MemoryEntry) -> Self {
        Self {
            product_id: entry.product_id,
            title: entry.product_data.title,
            site: entry.product_data.site,
            url: entry.product_data.url,
            timestamp: entry.timestamp,
            overall_sentiment: entry.analysis_results.overall_sentiment,
            confidence_score: entry.analysis_results.confidence_score,
            review_count: entry.analysis_results.review_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
}

pub(super) async fn list_recent(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<ApiResponse<Vec<AnalysisItem>>>, ApiError> {
    let entries = state
        .memory
        .recent(normalize_limit(query.limit))
        .await
        .map_err(|e| map_memory_error(&req_id, &e))?;

    Ok(Json(ApiResponse {
        data: entries.into_iter().map(AnalysisItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<AnalysisItem>>>, ApiError> {
    let needle = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required query parameter: q"))?;

    let entries = state
        .memory
        .search(needle)
        .await
        .map_err(|e| map_memory_error(&req_id, &e))?;

    Ok(Json(ApiResponse {
        data: entries.into_iter().map(AnalysisItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
