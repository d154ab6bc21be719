// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session state for one capture/review cycle.

use chrono::{DateTime, Utc};
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{
    CaptureEvent, CommittedScan, Corners, DetectionStatus, ImageReference, SessionId,
};

/// Where the session is in its capture/review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Camera live, nothing captured yet.
    Scanning,
    /// A capture is shown for review.
    Reviewing,
    /// A re-crop is in flight; the previous image stays on screen.
    Recropping,
}

/// What observers receive after every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub phase: SessionPhase,
    /// Image to render in the review view, if any.
    pub displayed_image: Option<ImageReference>,
    pub processing: bool,
    pub detection: DetectionStatus,
}

/// The captured images and geometry under review.
#[derive(Debug, Clone)]
struct Review {
    corrected_image: ImageReference,
    original_image: Option<ImageReference>,
    corners: Option<Corners>,
    captured_at: DateTime<Utc>,
}

/// State of one scan session.
///
/// The corrected image exists exactly when the session is in review, so a
/// reviewing session can never show a blank image.
#[derive(Debug)]
pub struct ScanSession {
    id: SessionId,
    review: Option<Review>,
    /// True strictly while a re-crop is in flight.
    processing: bool,
    detection: DetectionStatus,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    /// An empty session waiting for its first capture.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            review: None,
            processing: false,
            detection: DetectionStatus::default(),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.review, self.processing) {
            (None, _) => SessionPhase::Scanning,
            (Some(_), false) => SessionPhase::Reviewing,
            (Some(_), true) => SessionPhase::Recropping,
        }
    }

    pub fn corrected_image(&self) -> Option<&ImageReference> {
        self.review.as_ref().map(|r| &r.corrected_image)
    }

    pub fn original_image(&self) -> Option<&ImageReference> {
        self.review.as_ref().and_then(|r| r.original_image.as_ref())
    }

    pub fn corners(&self) -> Option<&Corners> {
        self.review.as_ref().and_then(|r| r.corners.as_ref())
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn detection(&self) -> DetectionStatus {
        self.detection
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            phase: self.phase(),
            displayed_image: self.corrected_image().cloned(),
            processing: self.processing,
            detection: self.detection,
        }
    }

    // -- Lifecycle ------------------------------------------------------------

    /// Record a completed capture, replacing any previous one wholesale.
    ///
    /// Rejected with `AlreadyInProgress` while a re-crop is in flight.
    pub fn capture(&mut self, event: CaptureEvent) -> Result<()> {
        if self.processing {
            return Err(ScanError::AlreadyInProgress);
        }
        self.id = SessionId::new();
        self.review = Some(Review {
            corrected_image: event.corrected_image,
            original_image: event.original_image,
            corners: event.corners,
            captured_at: Utc::now(),
        });
        Ok(())
    }

    /// Discard the capture and return to scanning.
    ///
    /// Rejected with `AlreadyInProgress` while a re-crop is in flight; the
    /// caller retries once the session is idle.
    pub fn retake(&mut self) -> Result<()> {
        if self.processing {
            return Err(ScanError::AlreadyInProgress);
        }
        *self = Self::new();
        Ok(())
    }

    /// Export the reviewed scan without touching the session.
    pub fn commit(&self) -> Result<CommittedScan> {
        let review = self.review.as_ref().ok_or(ScanError::NothingToCommit)?;
        Ok(CommittedScan {
            corrected_image: review.corrected_image.clone(),
            original_image: review.original_image.clone(),
            corners: review.corners,
            captured_at: review.captured_at,
        })
    }

    /// Display-only detector feedback.
    pub fn set_detection(&mut self, status: DetectionStatus) {
        self.detection = status;
    }

    // -- Re-crop bookkeeping (driven by the coordinator) ----------------------

    /// Check the re-crop preconditions and hand back its inputs.
    ///
    /// Checked in order: in-flight, original image, corners.
    pub(crate) fn recrop_inputs(&self) -> Result<(ImageReference, Corners)> {
        if self.processing {
            return Err(ScanError::AlreadyInProgress);
        }
        let original = self.original_image().ok_or(ScanError::MissingSource)?;
        let corners = self.corners().ok_or(ScanError::MissingGeometry)?;
        Ok((original.clone(), *corners))
    }

    pub(crate) fn set_processing(&mut self, processing: bool) {
        self.processing = processing;
    }

    /// Install a re-cropped image and leave the in-flight state.
    pub(crate) fn finish_recrop(&mut self, corrected: ImageReference) {
        if let Some(review) = self.review.as_mut() {
            review.corrected_image = corrected;
        }
        self.processing = false;
    }
}
