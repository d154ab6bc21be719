// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-flight re-crop coordinator.
//
// Owns one scan session, guards the perspective transform call so at most
// one re-crop is in flight, and publishes a snapshot to subscribers after
// every state change. The session mutex is only held for bookkeeping, never
// across the service call.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use docscan_bridge::PerspectiveTransform;
use docscan_core::ScanConfig;
use docscan_core::error::{Result, ScanError, Unavailable};
use docscan_core::types::{CaptureEvent, CommittedScan, DetectionStatus, ImageReference, Quality};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::normalize::{to_displayable, to_service_input};
use crate::session::{ScanSession, SessionSnapshot};

/// Tunables for the re-crop path.
#[derive(Debug, Clone)]
pub struct RecropSettings {
    /// Used when the caller's quality hint is absent or out of range.
    pub default_quality: Quality,
    /// Upper bound on one service call; expiry reports `ServiceUnavailable`.
    pub timeout: Duration,
    /// MIME type for wrapping bare service output.
    pub default_mime: String,
}

impl Default for RecropSettings {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

impl From<&ScanConfig> for RecropSettings {
    fn from(config: &ScanConfig) -> Self {
        Self {
            default_quality: config.default_quality(),
            timeout: config.service_timeout(),
            default_mime: config.default_mime.clone(),
        }
    }
}

struct Inner {
    session: Mutex<ScanSession>,
    service: Option<Arc<dyn PerspectiveTransform>>,
    settings: RecropSettings,
    updates: watch::Sender<SessionSnapshot>,
}

impl Inner {
    /// The session is plain data, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ScanSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, session: &ScanSession) {
        self.updates.send_replace(session.snapshot());
    }

    fn available_service(&self) -> Result<Arc<dyn PerspectiveTransform>> {
        match &self.service {
            Some(service) if service.is_available() => Ok(Arc::clone(service)),
            Some(service) => Err(ScanError::ServiceUnavailable(
                format!("{} backend is not registered", service.platform_name()).into(),
            )),
            None => Err(ScanError::ServiceUnavailable(
                "no perspective transform backend configured".into(),
            )),
        }
    }
}

/// Clears the in-flight flag on every exit from a re-crop, including
/// early returns, panics, and the caller dropping the future.
struct ProcessingGuard<'a> {
    inner: &'a Inner,
    completed: bool,
}

impl ProcessingGuard<'_> {
    fn complete(mut self, corrected: ImageReference) {
        let mut session = self.inner.lock();
        session.finish_recrop(corrected);
        self.inner.publish(&session);
        self.completed = true;
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        let mut session = self.inner.lock();
        session.set_processing(false);
        self.inner.publish(&session);
    }
}

/// Coordinates capture, review, re-crop, and commit for one scan session.
///
/// Cheaply cloneable; clones share the same session.
#[derive(Clone)]
pub struct RecropCoordinator {
    inner: Arc<Inner>,
}

impl RecropCoordinator {
    /// `service` is `None` when no backend is registered in this runtime;
    /// re-crops then fail with `ServiceUnavailable`.
    pub fn new(service: Option<Arc<dyn PerspectiveTransform>>, settings: RecropSettings) -> Self {
        let session = ScanSession::new();
        let (updates, _) = watch::channel(session.snapshot());
        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(session),
                service,
                settings,
                updates,
            }),
        }
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.updates.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn is_processing(&self) -> bool {
        self.inner.lock().is_processing()
    }

    /// Name of the configured backend, if any.
    pub fn backend_name(&self) -> Option<&str> {
        self.inner.service.as_deref().map(|s| s.platform_name())
    }

    // -- Lifecycle ------------------------------------------------------------

    pub fn capture(&self, event: CaptureEvent) -> Result<()> {
        let mut session = self.inner.lock();
        session.capture(event)?;
        info!(
            session_id = %session.id(),
            has_original = session.original_image().is_some(),
            has_corners = session.corners().is_some(),
            "capture recorded"
        );
        self.inner.publish(&session);
        Ok(())
    }

    pub fn retake(&self) -> Result<()> {
        let mut session = self.inner.lock();
        let previous = session.id();
        session.retake().inspect_err(|_| {
            warn!(session_id = %previous, "retake rejected while a re-crop is in flight");
        })?;
        info!(session_id = %previous, "session cleared for retake");
        self.inner.publish(&session);
        Ok(())
    }

    pub fn commit(&self) -> Result<CommittedScan> {
        let session = self.inner.lock();
        let committed = session.commit()?;
        info!(session_id = %session.id(), image_kind = committed.corrected_image.kind(), "scan committed");
        Ok(committed)
    }

    pub fn update_detection(&self, status: DetectionStatus) {
        let mut session = self.inner.lock();
        if session.detection() != status {
            session.set_detection(status);
            self.inner.publish(&session);
        }
    }

    // -- Re-crop --------------------------------------------------------------

    /// Re-apply perspective correction to the original capture.
    ///
    /// On success the new image replaces the displayed one and is returned.
    /// On any failure the previously displayed image is kept. Nothing is
    /// retried; the caller decides whether to try again.
    #[instrument(skip(self), fields(session_id))]
    pub async fn recrop(&self, quality_hint: Option<f32>) -> Result<ImageReference> {
        let result = self.recrop_inner(quality_hint).await;
        match &result {
            Ok(image) => info!(image_kind = image.kind(), image_len = image.len(), "re-crop applied"),
            Err(err) if err.is_precondition() => warn!(error = %err, "cannot re-crop"),
            Err(err) => error!(error = %err, "re-crop failed"),
        }
        result
    }

    async fn recrop_inner(&self, quality_hint: Option<f32>) -> Result<ImageReference> {
        let inner = &*self.inner;

        // Check-then-set under one lock: no second caller can slip in.
        let (service, source, corners) = {
            let mut session = inner.lock();
            tracing::Span::current().record("session_id", tracing::field::display(session.id()));
            let (source, corners) = session.recrop_inputs()?;
            let service = inner.available_service()?;
            session.set_processing(true);
            inner.publish(&session);
            (service, source, corners)
        };
        let guard = ProcessingGuard {
            inner,
            completed: false,
        };

        let input = to_service_input(&source)?;
        let quality = Quality::resolve(quality_hint, inner.settings.default_quality);
        debug!(
            backend = service.platform_name(),
            inline = input.is_inline(),
            input_len = input.len(),
            quality = quality.value(),
            "invoking perspective transform"
        );

        let timeout = inner.settings.timeout;
        let output = tokio::time::timeout(timeout, service.correct(input, corners, quality))
            .await
            .map_err(|_| ScanError::ServiceUnavailable(Unavailable::TimedOut(timeout)))?
            .map_err(as_service_failure)?
            .filter(|output| !output.is_empty())
            .ok_or_else(|| ScanError::ServiceFailed("service returned no image".into()))?;

        let corrected = to_displayable(output, &inner.settings.default_mime);
        guard.complete(corrected.clone());
        Ok(corrected)
    }
}

/// Anything the service raises other than unavailability is a failed run.
fn as_service_failure(err: ScanError) -> ScanError {
    match err {
        ScanError::ServiceUnavailable(_) | ScanError::ServiceFailed(_) => err,
        other => ScanError::ServiceFailed(other.to_string()),
    }
}
