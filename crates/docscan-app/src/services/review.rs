// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Review services. Drives one capture → re-crop → commit cycle the way the
// review screen would, minus the rendering.

use std::path::Path;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use docscan_bridge::{PerspectiveTransform, platform_bridge, select_service};
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{CaptureEvent, CommittedScan, Corners, FILE_SCHEME, ImageReference};
use docscan_core::ScanConfig;
use docscan_document::LocalPerspectiveService;
use docscan_session::{RecropCoordinator, RecropSettings};
use tracing::{debug, info};

/// Strings in printed JSON longer than this are abbreviated.
const PREVIEW_LEN: usize = 48;

/// Owns the coordinator for the current scan.
pub struct ReviewServices {
    coordinator: RecropCoordinator,
}

impl ReviewServices {
    /// Prefer a native bridge; fall back to the in-process service.
    pub fn init(config: &ScanConfig) -> Self {
        let local: Arc<dyn PerspectiveTransform> = Arc::new(LocalPerspectiveService::new());
        let service = select_service([platform_bridge(), local]);
        Self::with_service(service, config)
    }

    pub fn with_service(service: Option<Arc<dyn PerspectiveTransform>>, config: &ScanConfig) -> Self {
        let coordinator = RecropCoordinator::new(service, RecropSettings::from(config));
        info!(backend = coordinator.backend_name().unwrap_or("none"), "review services initialised");
        Self { coordinator }
    }

    /// Capture `image` with the given corners, re-crop it once, and commit.
    pub async fn recrop_file(
        &self,
        image: &Path,
        corners: Corners,
        quality: Option<f32>,
    ) -> Result<CommittedScan> {
        let absolute = std::fs::canonicalize(image)?;
        let original = ImageReference::file(&absolute);

        let mut updates = self.coordinator.subscribe();
        let watcher = tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let snapshot = updates.borrow_and_update().clone();
                debug!(
                    session_id = %snapshot.session_id,
                    phase = ?snapshot.phase,
                    processing = snapshot.processing,
                    "session updated"
                );
            }
        });

        self.coordinator.capture(CaptureEvent {
            corrected_image: original.clone(),
            original_image: Some(original),
            corners: Some(corners),
        })?;
        let outcome = self.coordinator.recrop(quality).await;
        watcher.abort();
        outcome?;

        self.coordinator.commit()
    }
}

/// Resolve a displayable reference back to encoded image bytes.
pub fn displayable_bytes(image: &ImageReference) -> Result<Vec<u8>> {
    let payload = match image {
        ImageReference::FileUri(uri) => {
            let path = uri.strip_prefix(FILE_SCHEME).unwrap_or(uri);
            return Ok(std::fs::read(path)?);
        }
        ImageReference::DataUri(uri) => uri
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or_else(|| ScanError::InvalidImage("data URI has no payload".into()))?,
        ImageReference::Bare(payload) => payload.as_str(),
    };
    STANDARD
        .decode(payload)
        .map_err(|err| ScanError::InvalidImage(format!("invalid base64 payload: {err}")))
}

/// Committed scan as JSON with long image strings shortened for the terminal.
pub fn commit_summary(committed: &CommittedScan) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(committed)?;
    if let Some(fields) = value.as_object_mut() {
        for key in ["correctedImage", "originalImage"] {
            if let Some(serde_json::Value::String(s)) = fields.get_mut(key) {
                if s.len() > PREVIEW_LEN {
                    let head: String = s.chars().take(PREVIEW_LEN).collect();
                    *s = format!("{head}… ({} bytes)", s.len());
                }
            }
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::types::Point;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn write_page(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("page.png");
        DynamicImage::ImageRgb8(RgbImage::from_pixel(80, 60, Rgb([240, 240, 240])))
            .save_with_format(&path, ImageFormat::Png)
            .expect("write page");
        path
    }

    fn corners() -> Corners {
        Corners::new(
            Point::new(10.0, 10.0),
            Point::new(70.0, 10.0),
            Point::new(70.0, 50.0),
            Point::new(10.0, 50.0),
        )
    }

    /// A file on disk is re-cropped by the local backend and committed.
    #[tokio::test]
    async fn recrop_file_round_trip_through_local_service() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = write_page(dir.path());
        let services = ReviewServices::init(&ScanConfig::default());

        let committed = services
            .recrop_file(&page, corners(), Some(0.9))
            .await
            .expect("recrop");

        assert!(committed.corrected_image.as_str().starts_with("data:image/jpeg;base64,"));
        assert!(matches!(committed.original_image, Some(ImageReference::FileUri(_))));

        let bytes = displayable_bytes(&committed.corrected_image).expect("bytes");
        let image = image::load_from_memory(&bytes).expect("jpeg");
        assert_eq!((image.width(), image.height()), (60, 40));
    }

    #[tokio::test]
    async fn missing_backend_surfaces_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = write_page(dir.path());
        let services = ReviewServices::with_service(None, &ScanConfig::default());

        let result = services.recrop_file(&page, corners(), None).await;
        assert!(matches!(result, Err(ScanError::ServiceUnavailable(_))));
    }

    #[test]
    fn summary_abbreviates_long_images() {
        let committed = CommittedScan {
            corrected_image: ImageReference::inline(&"A".repeat(500), "image/jpeg"),
            original_image: Some(ImageReference::classify("file:///tmp/p.png")),
            corners: Some(corners()),
            captured_at: chrono::Utc::now(),
        };
        let summary = commit_summary(&committed).expect("summary");
        let corrected = summary["correctedImage"].as_str().expect("string");
        assert!(corrected.ends_with("bytes)"));
        assert!(corrected.len() < 100);
        assert_eq!(summary["originalImage"], "file:///tmp/p.png");
        assert_eq!(summary["corners"]["topLeft"]["x"], 10.0);
    }

    #[test]
    fn bare_and_data_payloads_decode() {
        let data = ImageReference::inline("aGVsbG8=", "image/jpeg");
        assert_eq!(displayable_bytes(&data).expect("data"), b"hello");
        let bare = ImageReference::classify("aGVsbG8=");
        assert_eq!(displayable_bytes(&bare).expect("bare"), b"hello");
    }
}
