// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local perspective transform service built on `image` + `imageproc`.

use async_trait::async_trait;
use docscan_bridge::PerspectiveTransform;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{Corners, Quality, ServiceInput, ServiceOutput};
use tracing::{info, instrument};

use crate::codec::{decode_input, encode_jpeg_base64};
use crate::warp::warp_to_rectangle;

/// In-process stand-in for the native scanner module.
///
/// Returns bare base64 JPEG payloads, the same convention the iOS module
/// uses, so callers exercise the same normalization path either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPerspectiveService;

impl LocalPerspectiveService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PerspectiveTransform for LocalPerspectiveService {
    fn platform_name(&self) -> &str {
        "Desktop (local)"
    }

    async fn correct(
        &self,
        image: ServiceInput,
        corners: Corners,
        quality: Quality,
    ) -> Result<Option<ServiceOutput>> {
        // Decoding and warping are CPU-bound; keep them off the async workers.
        tokio::task::spawn_blocking(move || correct_blocking(&image, &corners, quality))
            .await
            .map_err(|err| ScanError::Image(format!("perspective worker failed: {err}")))?
            .map(Some)
    }
}

/// Decode, warp, and re-encode synchronously.
#[instrument(skip(image, corners), fields(inline = image.is_inline(), input_len = image.len(), quality = quality.value()))]
pub fn correct_blocking(image: &ServiceInput, corners: &Corners, quality: Quality) -> Result<ServiceOutput> {
    let decoded = decode_input(image)?;
    let warped = warp_to_rectangle(&decoded, corners)?;
    let payload = encode_jpeg_base64(&warped, quality)?;
    info!(
        out_w = warped.width(),
        out_h = warped.height(),
        payload_len = payload.len(),
        "perspective re-crop complete"
    );
    Ok(ServiceOutput::new(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use docscan_core::types::Point;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn square_corners() -> Corners {
        Corners::new(
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(50.0, 30.0),
            Point::new(10.0, 30.0),
        )
    }

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, Rgb([90, 90, 90])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("encode png");
        out.into_inner()
    }

    fn decode_output(output: &ServiceOutput) -> DynamicImage {
        let bytes = STANDARD.decode(output.as_str()).expect("bare base64");
        image::load_from_memory(&bytes).expect("jpeg")
    }

    /// Inline input comes back as bare base64, not a data URI.
    #[tokio::test]
    async fn inline_input_returns_bare_jpeg_payload() {
        let input = ServiceInput::Inline(STANDARD.encode(png_bytes()));
        let output = LocalPerspectiveService::new()
            .correct(input, square_corners(), Quality::DEFAULT)
            .await
            .expect("correct")
            .expect("some output");

        assert!(!output.as_str().starts_with("data:"));
        let image = decode_output(&output);
        assert_eq!((image.width(), image.height()), (40, 20));
    }

    #[tokio::test]
    async fn file_input_is_resolved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture.png");
        std::fs::write(&path, png_bytes()).expect("write");

        let input = ServiceInput::Path(format!("file://{}", path.display()));
        let output = LocalPerspectiveService::new()
            .correct(input, square_corners(), Quality::DEFAULT)
            .await
            .expect("correct")
            .expect("some output");
        assert_eq!(decode_output(&output).width(), 40);
    }

    #[tokio::test]
    async fn undecodable_input_fails() {
        let result = LocalPerspectiveService::new()
            .correct(ServiceInput::Inline("AAAA".into()), square_corners(), Quality::DEFAULT)
            .await;
        assert!(matches!(result, Err(ScanError::Image(_))));
    }

    /// Corners beyond the decoded image fail before any canvas is allocated.
    #[tokio::test]
    async fn corners_outside_the_image_fail() {
        let far = Corners::new(
            Point::new(0.0, 0.0),
            Point::new(6000.0, 0.0),
            Point::new(6000.0, 6000.0),
            Point::new(0.0, 6000.0),
        );
        let input = ServiceInput::Inline(STANDARD.encode(png_bytes()));
        let result = LocalPerspectiveService::new()
            .correct(input, far, Quality::DEFAULT)
            .await;
        assert!(matches!(result, Err(ScanError::Image(_))));
    }

    #[test]
    fn local_service_is_available() {
        assert!(LocalPerspectiveService.is_available());
    }
}
