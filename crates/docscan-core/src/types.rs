// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for scan capture and review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Scheme prefix for inline image payloads (`data:image/jpeg;base64,...`).
pub const DATA_SCHEME: &str = "data:";

/// Scheme prefix for filesystem image references.
pub const FILE_SCHEME: &str = "file://";

/// Unique identifier for a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Image references
// ---------------------------------------------------------------------------

/// An opaque handle to an encoded image, classified by its prefix.
///
/// The payload itself is never decoded here; the variants only record which
/// convention the producing platform used so the normalizer can translate
/// between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageReference {
    /// Inline payload with no scheme (typically bare base64).
    Bare(String),
    /// Inline payload carrying an explicit `data:` scheme.
    DataUri(String),
    /// Filesystem reference carrying a `file://` scheme.
    FileUri(String),
}

impl ImageReference {
    /// Classify a raw handle string by its prefix.
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with(DATA_SCHEME) {
            Self::DataUri(raw)
        } else if raw.starts_with(FILE_SCHEME) {
            Self::FileUri(raw)
        } else {
            Self::Bare(raw)
        }
    }

    /// Wrap a bare base64 payload in a `data:` URI with the given MIME type.
    pub fn inline(payload: &str, mime_type: &str) -> Self {
        Self::DataUri(format!("{DATA_SCHEME}{mime_type};base64,{payload}"))
    }

    /// Build a `file://` reference for an absolute filesystem path.
    pub fn file(path: impl AsRef<std::path::Path>) -> Self {
        Self::FileUri(format!("{FILE_SCHEME}{}", path.as_ref().display()))
    }

    /// The raw handle string, prefix included.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bare(s) | Self::DataUri(s) | Self::FileUri(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Bare(s) | Self::DataUri(s) | Self::FileUri(s) => s,
        }
    }

    /// Short tag for log fields (payloads themselves are never logged).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bare(_) => "bare",
            Self::DataUri(_) => "data-uri",
            Self::FileUri(_) => "file-uri",
        }
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl From<String> for ImageReference {
    fn from(raw: String) -> Self {
        Self::classify(raw)
    }
}

impl From<&str> for ImageReference {
    fn from(raw: &str) -> Self {
        Self::classify(raw)
    }
}

impl From<ImageReference> for String {
    fn from(reference: ImageReference) -> Self {
        reference.into_string()
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image handed to the perspective transform service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceInput {
    /// Bare inline payload, scheme already stripped.
    Inline(String),
    /// Filesystem reference, passed through as-is for the service to resolve.
    Path(String),
}

impl ServiceInput {
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Inline(s) | Self::Path(s) => s,
        }
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

/// String returned by the perspective transform service, with surrounding
/// whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOutput(String);

impl ServiceOutput {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.len() == raw.len() {
            Self(raw)
        } else {
            Self(trimmed.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Blank output carries no usable image.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point in the pixel space of the original image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The four detected document corners, in the detector's wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Corners {
    pub const fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Clockwise from top-left.
    pub fn as_array(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.as_array()
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }
}

// ---------------------------------------------------------------------------
// Quality
// ---------------------------------------------------------------------------

/// Output encoding quality in the range (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Quality(f32);

impl Quality {
    /// Fallback used when neither the caller nor the configuration says otherwise.
    pub const DEFAULT: Quality = Quality(0.8);

    /// Returns `None` outside (0, 1] (NaN included).
    pub fn new(value: f32) -> Option<Self> {
        (value > 0.0 && value <= 1.0).then_some(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Pick the caller's hint if it is usable, else `default`.
    ///
    /// An absent hint, zero, a negative value, NaN, or anything above 1 all
    /// fall back to `default`.
    pub fn resolve(hint: Option<f32>, default: Quality) -> Quality {
        match hint {
            None => default,
            Some(value) => Self::new(value).unwrap_or_else(|| {
                warn!(hint = value, fallback = default.0, "quality hint out of range; using default");
                default
            }),
        }
    }

    /// Map onto the 1..=100 scale used by JPEG encoders.
    pub fn jpeg_quality(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f32> for Quality {
    type Error = String;

    fn try_from(value: f32) -> std::result::Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("quality {value} is outside (0, 1]"))
    }
}

impl From<Quality> for f32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

// ---------------------------------------------------------------------------
// Capture and commit payloads
// ---------------------------------------------------------------------------

/// Delivered by the camera view when a capture completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureEvent {
    /// The automatically corrected image shown first in review.
    pub corrected_image: ImageReference,
    /// The uncorrected full-resolution frame, if the detector kept it.
    pub original_image: Option<ImageReference>,
    /// Detected document boundary in the original image's coordinates.
    pub corners: Option<Corners>,
}

/// Read-only export handed to the caller when the user keeps a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedScan {
    pub corrected_image: ImageReference,
    pub original_image: Option<ImageReference>,
    pub corners: Option<Corners>,
    pub captured_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Detection status
// ---------------------------------------------------------------------------

/// Classification of the last rectangle detection, used for display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectionQuality {
    #[default]
    Unknown,
    Good,
    BadAngle,
    TooFar,
}

impl DetectionQuality {
    /// Decode the native detector's integer code.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Good,
            1 => Self::BadAngle,
            2 => Self::TooFar,
            _ => Self::Unknown,
        }
    }
}

/// Latest detection-status-changed event from the camera view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetectionStatus {
    /// Consecutive frames with a stable rectangle.
    pub stable_counter: u32,
    pub last_detection: DetectionQuality,
}

impl DetectionStatus {
    pub fn ready_to_capture(&self) -> bool {
        self.stable_counter > 0
    }

    /// Guidance line shown above the capture button.
    pub fn message(&self) -> &'static str {
        if self.ready_to_capture() {
            return "✓ Ready to capture";
        }
        match self.last_detection {
            DetectionQuality::BadAngle => "⚠ Adjust angle",
            DetectionQuality::TooFar => "⚠ Move closer",
            DetectionQuality::Good | DetectionQuality::Unknown => "Position document in frame",
        }
    }
}
