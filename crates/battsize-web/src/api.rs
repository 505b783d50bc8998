// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use crate::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use battsize_core::{
    BatteryCatalogItem, ChemistryFilter, Error, RecommendationInputs, RecommendationResult,
    SizingInputs, SizingResult, TierFilter, ValidationIssue, ValidationResult, calculate,
    validate_recommendation_inputs, validate_sizing_inputs,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Error returned by API handlers
///
/// Validation failures map to 422 with the full [`ValidationResult`] as body,
/// everything else to 500 with `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Error::Validation(result) = &self.0 {
            debug!("Rejected request: {}", result.summary());
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(result)).into_response();
        }

        error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Response for GET /health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub catalog_size: usize,
}

/// Query string for GET /api/catalog
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub tier: Option<String>,
    pub chemistry: Option<String>,
    pub region: Option<String>,
}

/// Request body for POST /api/plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub sizing: SizingInputs,
    #[serde(default)]
    pub location_tag: Option<String>,
    #[serde(default)]
    pub tier_filter: TierFilter,
    #[serde(default)]
    pub chemistry_filter: ChemistryFilter,
}

/// Response for POST /api/plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub sizing: SizingResult,
    pub recommendations: RecommendationResult,
    /// Non-fatal input warnings from both steps
    pub warnings: Vec<ValidationIssue>,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        catalog_size: state.catalog.len(),
    })
}

/// GET /api/catalog - List catalog items, optionally filtered
pub async fn catalog_handler(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<BatteryCatalogItem>>, ApiError> {
    let mut validation = ValidationResult::success();

    let tier_filter = parse_filter::<TierFilter>(query.tier.as_deref(), "tier", &mut validation);
    let chemistry_filter =
        parse_filter::<ChemistryFilter>(query.chemistry.as_deref(), "chemistry", &mut validation);
    validation.into_result()?;

    let items = state
        .catalog
        .filtered(query.region.as_deref(), tier_filter, chemistry_filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(items))
}

/// POST /api/size - Run the sizing calculator
pub async fn size_handler(Json(inputs): Json<SizingInputs>) -> Result<Json<SizingResult>, ApiError> {
    validate_sizing_inputs(&inputs).into_result()?;
    Ok(Json(calculate(&inputs)))
}

/// POST /api/recommend - Run the recommender for a usable capacity target
pub async fn recommend_handler(
    State(state): State<AppState>,
    Json(inputs): Json<RecommendationInputs>,
) -> Result<Json<RecommendationResult>, ApiError> {
    validate_recommendation_inputs(&inputs, &state.catalog).into_result()?;
    Ok(Json(state.catalog.recommend(&inputs)))
}

/// POST /api/plan - Size the battery, then recommend products for the result
pub async fn plan_handler(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let mut validation = validate_sizing_inputs(&request.sizing).into_result()?;
    let sizing = calculate(&request.sizing);

    let mut inputs = RecommendationInputs::new(sizing.battery_usable_needed_kwh)
        .with_tier(request.tier_filter)
        .with_chemistry(request.chemistry_filter);
    inputs.location_tag = request.location_tag;

    validation.merge(validate_recommendation_inputs(&inputs, &state.catalog));
    let validation = validation.into_result()?;

    Ok(Json(PlanResponse {
        sizing,
        recommendations: state.catalog.recommend(&inputs),
        warnings: validation.warnings,
    }))
}

fn parse_filter<T>(raw: Option<&str>, field: &str, validation: &mut ValidationResult) -> T
where
    T: std::str::FromStr<Err: std::fmt::Display> + Default,
{
    match raw.map(str::parse::<T>) {
        Some(Ok(filter)) => filter,
        Some(Err(e)) => {
            validation.add_error(field, e.to_string());
            T::default()
        }
        None => T::default(),
    }
}
