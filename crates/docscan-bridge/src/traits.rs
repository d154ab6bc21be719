// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the perspective transform service.
//
// The native scanner module owns edge detection and the homography itself.
// The review screen only ever asks it to re-apply a crop to an image it has
// already captured.

use async_trait::async_trait;
use docscan_core::error::Result;
use docscan_core::types::{Corners, Quality, ServiceInput, ServiceOutput};

/// Re-applies perspective correction to a previously captured image.
#[async_trait]
pub trait PerspectiveTransform: Send + Sync {
    /// Human-readable backend name (e.g. "Desktop (local)", "Desktop (stub)").
    fn platform_name(&self) -> &str;

    /// Whether the backend is registered in the current runtime.
    ///
    /// Callers check this before starting work so an absent module is
    /// reported as `ScanError::ServiceUnavailable` instead of a failed call.
    fn is_available(&self) -> bool {
        true
    }

    /// De-skew `image` to the quadrilateral `corners` and re-encode it.
    ///
    /// Returns `Ok(None)` when the backend ran but produced nothing. The
    /// output may be a bare payload or carry a `data:`/`file://` prefix,
    /// depending on the platform.
    async fn correct(
        &self,
        image: ServiceInput,
        corners: Corners,
        quality: Quality,
    ) -> Result<Option<ServiceOutput>>;
}
