// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image reference normalization between the review screen and the
// perspective transform service.
//
// Pure prefix classification. Payloads are never decoded here.

use docscan_core::error::{Result, ScanError};
use docscan_core::types::{ImageReference, ServiceInput, ServiceOutput};

/// Translate a session image into what the transform service expects.
///
/// `data:` URIs lose everything up to and including the first `,` and are
/// passed as inline payloads. `file://` references pass through untouched.
/// Anything else is already a bare inline payload.
pub fn to_service_input(reference: &ImageReference) -> Result<ServiceInput> {
    match reference {
        ImageReference::DataUri(uri) => {
            let (_, payload) = uri.split_once(',').ok_or_else(|| {
                ScanError::InvalidImage("data URI has no ',' before its payload".into())
            })?;
            Ok(ServiceInput::Inline(payload.to_owned()))
        }
        ImageReference::FileUri(path) => Ok(ServiceInput::Path(path.clone())),
        ImageReference::Bare(payload) => Ok(ServiceInput::Inline(payload.clone())),
    }
}

/// Translate service output into a reference the review screen can render.
///
/// Output that already carries a `data:` or `file://` scheme is kept as-is;
/// a bare payload is wrapped in a `data:` URI with `default_mime`.
pub fn to_displayable(output: ServiceOutput, default_mime: &str) -> ImageReference {
    match ImageReference::classify(output.into_inner()) {
        ImageReference::Bare(payload) => ImageReference::inline(&payload, default_mime),
        prefixed => prefixed,
    }
}
