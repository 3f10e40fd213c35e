// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;
use waste_sorter::{
    api::{create_router, AppState},
    detector::DisabledDetector,
    WasteClassifier,
};

async fn get_health(classifier: WasteClassifier) -> (StatusCode, Value) {
    let app = create_router(AppState::new(classifier));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_without_detector() {
    let (status, json) = get_health(WasteClassifier::new(Arc::new(DisabledDetector))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["mode"], "fused");
    assert_eq!(json["detector"]["name"], "disabled");
    assert_eq!(json["detector"]["configured"], false);
    assert_eq!(json["detector"]["reachable"], false);
    assert!(json.get("cache").is_none());
}

#[tokio::test]
async fn test_health_reports_cache() {
    let classifier = WasteClassifier::new(Arc::new(DisabledDetector)).with_cache(16);
    let (_, json) = get_health(classifier).await;

    assert_eq!(json["cache"]["capacity"], 16);
    assert_eq!(json["cache"]["entries"], 0);
}
