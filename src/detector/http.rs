// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP client for an object-detection sidecar
//!
//! The sidecar receives `POST {endpoint}/v1/detect` with a base64 PNG and
//! answers with YOLO-style records, either as a bare array or wrapped in
//! `{"detections": [...]}`.

use async_trait::async_trait;
use image::RgbImage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::{DetectorError, PrimaryDetector};
use crate::detection::RawDetection;
use crate::vision::image_utils::encode_png_base64;

#[derive(Serialize)]
struct DetectRequest<'a> {
    image: &'a str,
    format: &'a str,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetectResponse {
    Wrapped { detections: Vec<RawDetection> },
    Bare(Vec<RawDetection>),
}

impl DetectResponse {
    fn into_records(self) -> Vec<RawDetection> {
        match self {
            DetectResponse::Wrapped { detections } => detections,
            DetectResponse::Bare(records) => records,
        }
    }
}

/// Primary detector reached over HTTP
pub struct HttpObjectDetector {
    client: Client,
    endpoint: String,
}

impl HttpObjectDetector {
    /// Create a new client; `timeout` bounds each detection call
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, DetectorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DetectorError::Request(e.to_string()))?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("Object detector configured: endpoint={}", endpoint);

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Parse a sidecar response body
    pub fn parse_response(body: &str) -> Result<Vec<RawDetection>, DetectorError> {
        serde_json::from_str::<DetectResponse>(body)
            .map(DetectResponse::into_records)
            .map_err(|e| DetectorError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PrimaryDetector for HttpObjectDetector {
    async fn detect(&self, image: &RgbImage) -> Result<Vec<RawDetection>, DetectorError> {
        let start = Instant::now();
        let encoded = encode_png_base64(image)?;

        let response = self
            .client
            .post(format!("{}/v1/detect", self.endpoint))
            .json(&DetectRequest {
                image: &encoded,
                format: "png",
            })
            .send()
            .await
            .map_err(|e| DetectorError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DetectorError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(DetectorError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let records = Self::parse_response(&body)?;
        debug!(
            "Detector returned {} records in {}ms",
            records.len(),
            start.elapsed().as_millis()
        );
        Ok(records)
    }

    fn name(&self) -> &str {
        "http"
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Detector health check failed: {}", e);
                false
            }
        }
    }
}
