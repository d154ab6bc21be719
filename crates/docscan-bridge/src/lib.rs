// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-bridge: perspective transform bridge abstractions.
//
// Defines the trait the review coordinator talks to and the dispatch that
// picks a backend at runtime. Native modules register through the same
// trait; where none is compiled in, the stub reports itself unavailable.

use std::sync::Arc;

pub mod stub;
pub mod traits;

pub use traits::PerspectiveTransform;

/// The native bridge for the target operating system.
///
/// No native scanner module is linked into this build, so this is always
/// the stub, which reports `is_available() == false`.
pub fn platform_bridge() -> Arc<dyn PerspectiveTransform> {
    Arc::new(stub::StubBridge)
}

/// Pick the first available backend, in priority order.
pub fn select_service<I>(candidates: I) -> Option<Arc<dyn PerspectiveTransform>>
where
    I: IntoIterator<Item = Arc<dyn PerspectiveTransform>>,
{
    for candidate in candidates {
        if candidate.is_available() {
            tracing::info!(backend = candidate.platform_name(), "perspective transform backend selected");
            return Some(candidate);
        }
        tracing::debug!(backend = candidate.platform_name(), "backend unavailable; skipping");
    }
    tracing::warn!("no perspective transform backend available");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docscan_core::error::Result;
    use docscan_core::types::{Corners, Quality, ServiceInput, ServiceOutput};

    struct Named(&'static str);

    #[async_trait]
    impl PerspectiveTransform for Named {
        fn platform_name(&self) -> &str {
            self.0
        }

        async fn correct(
            &self,
            _image: ServiceInput,
            _corners: Corners,
            _quality: Quality,
        ) -> Result<Option<ServiceOutput>> {
            Ok(Some(ServiceOutput::new("AAAA")))
        }
    }

    #[test]
    fn platform_bridge_is_stub_without_native_module() {
        assert!(!platform_bridge().is_available());
    }

    /// Unavailable backends are skipped in priority order.
    #[test]
    fn select_skips_unavailable_backends() {
        let chosen = select_service([platform_bridge(), Arc::new(Named("local")) as Arc<dyn PerspectiveTransform>])
            .expect("a backend");
        assert_eq!(chosen.platform_name(), "local");
    }

    #[test]
    fn select_returns_none_when_all_unavailable() {
        assert!(select_service([platform_bridge()]).is_none());
    }
}
