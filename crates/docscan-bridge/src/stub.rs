// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for runtimes where the native scanner module is not registered.
//
// Every call returns `ServiceUnavailable`. The local implementation lives in
// `docscan-document`.

use async_trait::async_trait;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{Corners, Quality, ServiceInput, ServiceOutput};

use crate::traits::PerspectiveTransform;

/// No-op bridge returned when no native module is present.
pub struct StubBridge;

#[async_trait]
impl PerspectiveTransform for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn correct(
        &self,
        _image: ServiceInput,
        _corners: Corners,
        _quality: Quality,
    ) -> Result<Option<ServiceOutput>> {
        tracing::warn!("PerspectiveTransform::correct called on stub bridge");
        Err(ScanError::ServiceUnavailable(
            "perspective transform module not registered".into(),
        ))
    }
}
