// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP surface: photo upload classification and health

pub mod classify;
pub mod errors;
pub mod http_server;

pub use classify::{classify_handler, ClassifyResponse};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_router, start_server, AppState, HealthResponse};
