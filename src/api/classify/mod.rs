// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Waste classification endpoint

pub mod handler;
pub mod response;

pub use handler::{classify_handler, IMAGE_FIELD};
pub use response::ClassifyResponse;
