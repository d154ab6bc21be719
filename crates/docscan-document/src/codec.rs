// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service input decoding and JPEG/base64 output encoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{FILE_SCHEME, Quality, ServiceInput};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use tracing::debug;

/// Decode a service input into an in-memory image.
///
/// Inline payloads are base64-decoded first. Paths may carry a `file://`
/// scheme, which is stripped before opening.
pub fn decode_input(input: &ServiceInput) -> Result<DynamicImage> {
    let image = match input {
        ServiceInput::Inline(payload) => {
            let bytes = STANDARD
                .decode(payload.trim())
                .map_err(|err| ScanError::Image(format!("invalid base64 payload: {err}")))?;
            image::load_from_memory(&bytes)
                .map_err(|err| ScanError::Image(format!("failed to decode inline image: {err}")))?
        }
        ServiceInput::Path(path) => {
            let fs_path = path.strip_prefix(FILE_SCHEME).unwrap_or(path);
            image::open(fs_path)
                .map_err(|err| ScanError::Image(format!("failed to open {fs_path}: {err}")))?
        }
    };
    debug!(width = image.width(), height = image.height(), "service input decoded");
    Ok(image)
}

/// Encode as JPEG at the given quality and return the bare base64 payload.
pub fn encode_jpeg_base64(image: &RgbImage, quality: Quality) -> Result<String> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.jpeg_quality())
        .encode_image(image)
        .map_err(|err| ScanError::Image(format!("JPEG encoding failed: {err}")))?;
    debug!(jpeg_bytes = jpeg.len(), quality = quality.jpeg_quality(), "output encoded");
    Ok(STANDARD.encode(jpeg))
}
