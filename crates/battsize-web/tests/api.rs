// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use battsize_core::{BatteryCatalogItem, Catalog, RecommendationResult, SizingResult};
use battsize_web::{HealthResponse, PlanResponse, router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    router(Arc::new(Catalog::builtin().unwrap()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app(), request).await
}

async fn post(uri: &str, body: &Value) -> (StatusCode, Vec<u8>) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app(), request).await
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.catalog_size, Catalog::builtin().unwrap().len());
}

#[tokio::test]
async fn test_catalog_listing_with_filters() {
    let (status, body) = get("/api/catalog").await;
    assert_eq!(status, StatusCode::OK);
    let all: Vec<BatteryCatalogItem> = serde_json::from_slice(&body).unwrap();
    assert_eq!(all.len(), Catalog::builtin().unwrap().len());

    let (status, body) = get("/api/catalog?tier=diy&region=us").await;
    assert_eq!(status, StatusCode::OK);
    let diy: Vec<BatteryCatalogItem> = serde_json::from_slice(&body).unwrap();
    assert!(!diy.is_empty());
    assert!(diy.len() < all.len());
    assert!(
        diy.iter()
            .all(|i| i.region_availability.is_available_in("US"))
    );
}

#[tokio::test]
async fn test_catalog_rejects_unknown_filter() {
    let (status, body) = get("/api/catalog?chemistry=sodium").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["valid"], json!(false));
    assert_eq!(body["errors"][0]["field"], json!("chemistry"));
}

#[tokio::test]
async fn test_size() {
    let (status, body) = post(
        "/api/size",
        &json!({
            "daily_load_kwh": 10.0,
            "days_of_autonomy": 1,
            "dod": 0.8,
            "efficiency": 0.9,
            "winter_mode": false,
            "reserve_buffer": 0.15
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let result: SizingResult = serde_json::from_slice(&body).unwrap();
    assert!((result.load_target_kwh - 11.5).abs() < 1e-9);
    assert!((result.battery_usable_needed_kwh - 12.8).abs() < 1e-9);
    assert!((result.battery_nameplate_needed_kwh - 16.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_size_uses_defaults_for_omitted_fields() {
    let (status, body) = post("/api/size", &json!({ "daily_load_kwh": 10.0 })).await;
    assert_eq!(status, StatusCode::OK);

    let result: SizingResult = serde_json::from_slice(&body).unwrap();
    assert!((result.battery_nameplate_needed_kwh - 16.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_size_validation_error() {
    let (status, body) = post(
        "/api/size",
        &json!({ "daily_load_kwh": 10.0, "days_of_autonomy": 1, "dod": 0.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["errors"][0]["field"], json!("dod"));
    assert_eq!(body["errors"][0]["severity"], json!("error"));
}

#[tokio::test]
async fn test_recommend() {
    let (status, body) = post(
        "/api/recommend",
        &json!({ "battery_usable_needed_kwh": 10.0, "location_tag": "IN" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let result: RecommendationResult = serde_json::from_slice(&body).unwrap();
    assert!(result.metadata.is_limited_catalog);
    assert!(result.iter().all(|c| !c.is_undersized));
}

#[tokio::test]
async fn test_recommend_rejects_zero_target() {
    let (status, _) = post("/api/recommend", &json!({ "battery_usable_needed_kwh": 0.0 })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_plan_chains_calculator_and_recommender() {
    let (status, body) = post(
        "/api/plan",
        &json!({
            "sizing": { "daily_load_kwh": 10.0, "days_of_autonomy": 1 },
            "location_tag": "zz",
            "tier_filter": "mid"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let plan: PlanResponse = serde_json::from_slice(&body).unwrap();
    assert!((plan.sizing.battery_usable_needed_kwh - 12.8).abs() < 1e-9);
    assert!(plan.recommendations.premium.is_empty());
    assert!(plan.recommendations.diy.is_empty());
    assert!(
        plan.recommendations
            .mid_range
            .iter()
            .all(|c| c.battery.region_availability.global)
    );
    assert_eq!(plan.warnings.len(), 1);
    assert_eq!(plan.warnings[0].field, "location_tag");
}

#[tokio::test]
async fn test_plan_rejects_load_too_small_to_size() {
    let (status, body) = post(
        "/api/plan",
        &json!({ "sizing": { "daily_load_kwh": 0.03, "days_of_autonomy": 1 } }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["errors"][0]["field"], json!("daily_load_kwh"));
}
