use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use buywise_analysis::{analyze_product, evaluate_preference_match, process_preferences};
use buywise_core::{
    AnalysisResult, MemoryChoiceRequest, MemoryMatchBody, ProductData, DEFAULT_SITE,
};
use tracing::{info, warn};

use crate::middleware::RequestId;

use super::{map_json_rejection, map_memory_error, ApiError, AppState};

pub(super) const MISSING_TITLE: &str = "Missing required field: title";
pub(super) const NO_REVIEWS_NOTE: &str =
    "No reviews were provided for analysis. The results are based on limited information.";

/// `POST /api/detect-product`: analyze a scraped product, or offer a prior
/// analysis of the same product for reuse.
pub(super) async fn detect_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ProductData>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(mut product) = payload.map_err(|r| map_json_rejection("Invalid product data", &r))?;
    require_title(&req_id, &product)?;
    default_site(&mut product);

    info!(
        request_id = %req_id.0,
        site = %product.site,
        review_count = product.reviews.len(),
        full_details = product.full_details,
        force_new_analysis = product.force_new_analysis,
        "received product detection"
    );

    if !product.force_new_analysis {
        let prior = state
            .memory
            .find_match(&product)
            .await
            .map_err(|e| map_memory_error(&req_id, &e))?;
        if let Some(entry) = prior {
            info!(request_id = %req_id.0, product_id = %entry.product_id, "prior analysis found");
            if let Some(prefs) = product.user_preferences.take() {
                state
                    .memory
                    .store_preferences(&process_preferences(Some(prefs)))
                    .await
                    .map_err(|e| map_memory_error(&req_id, &e))?;
            }
            return Ok(Json(MemoryMatchBody::new(entry.existing_analysis())).into_response());
        }
    }

    let result = analyze_and_store(&state, &req_id, product).await?;
    Ok(Json(result).into_response())
}

/// `POST /api/handle-memory-choice`: resolve the shopper's answer to a
/// prior-analysis offer.
pub(super) async fn handle_memory_choice(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<MemoryChoiceRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(choice) = payload.map_err(|r| map_json_rejection("Invalid memory choice", &r))?;

    match choice {
        MemoryChoiceRequest::UseExisting { product_id } => {
            let entry = state
                .memory
                .retrieve(&product_id)
                .await
                .map_err(|e| map_memory_error(&req_id, &e))?
                .ok_or_else(|| {
                    ApiError::not_found(format!("No stored analysis found for product: {product_id}"))
                })?;

            let current = state
                .memory
                .preferences()
                .await
                .map_err(|e| map_memory_error(&req_id, &e))?;

            let mut result = entry.analysis_results.clone();
            result.product_id = Some(entry.product_id.clone());
            if let Some(prefs) = current.as_ref().or(entry.user_preferences.as_ref()) {
                evaluate_preference_match(&entry.product_data, &result, prefs).apply_to(&mut result);
            }
            info!(request_id = %req_id.0, product_id = %entry.product_id, "reusing stored analysis");
            Ok(Json(result))
        }
        MemoryChoiceRequest::NewAnalysis { product_data } => {
            let mut product = *product_data;
            require_title(&req_id, &product)?;
            default_site(&mut product);
            product.force_new_analysis = true;
            analyze_and_store(&state, &req_id, product).await.map(Json)
        }
    }
}

fn require_title(req_id: &RequestId, product: &ProductData) -> Result<(), ApiError> {
    if product.title.trim().is_empty() {
        warn!(request_id = %req_id.0, "product request without a title");
        return Err(ApiError::bad_request(MISSING_TITLE));
    }
    Ok(())
}

fn default_site(product: &mut ProductData) {
    if product.site.trim().is_empty() {
        DEFAULT_SITE.clone_into(&mut product.site);
    }
}

/// Runs the pipeline, stores the entry and applies the preference match
/// when the request carried preferences.
async fn analyze_and_store(
    state: &AppState,
    req_id: &RequestId,
    mut product: ProductData,
) -> Result<AnalysisResult, ApiError> {
    let review_note = if product.reviews.is_empty() {
        warn!(request_id = %req_id.0, "no reviews provided in request");
        Some(NO_REVIEWS_NOTE.to_owned())
    } else {
        None
    };
    let preferences = product
        .user_preferences
        .take()
        .map(|prefs| process_preferences(Some(prefs)));

    let mut result = analyze_product(&product);
    result.review_note = review_note;

    let entry = state
        .memory
        .store(&product, &result, preferences.as_ref())
        .await
        .map_err(|e| map_memory_error(req_id, &e))?;
    result.product_id = Some(entry.product_id);

    if let Some(prefs) = &preferences {
        state
            .memory
            .store_preferences(prefs)
            .await
            .map_err(|e| map_memory_error(req_id, &e))?;
        evaluate_preference_match(&product, &result, prefs).apply_to(&mut result);
    }

    info!(
        request_id = %req_id.0,
        confidence = result.confidence_score,
        review_count = result.review_count,
        preference_match = ?result.preference_match_score,
        "analysis stored"
    );
    Ok(result)
}
