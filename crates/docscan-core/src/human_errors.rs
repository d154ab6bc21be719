// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the review screen.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Nothing here retries on its own; `retriable` only tells the UI whether
// pressing the button again could help.

use crate::error::{ScanError, Unavailable};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Momentary; trying again may work.
    Transient,
    /// User must do something first (retake, wait for the current edit).
    ActionRequired,
    /// Cannot be fixed from this screen.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether pressing the same button again could succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError`.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::AlreadyInProgress => HumanError {
            message: "We're still adjusting your scan.".into(),
            suggestion: "Please wait a moment for the current edit to finish.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::MissingSource | ScanError::MissingGeometry => HumanError {
            message: "This scan can't be adjusted.".into(),
            suggestion: "The original photo or its page edges weren't kept. Tap Retake to scan the page again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::ServiceUnavailable(Unavailable::TimedOut(_)) => HumanError {
            message: "Adjusting the scan took too long.".into(),
            suggestion: "Try again. If it keeps happening, retake the photo.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::ServiceUnavailable(Unavailable::Absent(_)) => HumanError {
            message: "Scan editing isn't available on this device.".into(),
            suggestion: "You can still keep the scan as it is.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::ServiceFailed(_) => HumanError {
            message: "We couldn't adjust this scan.".into(),
            suggestion: "Try again, or retake the photo with the whole page in view.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::NothingToCommit => HumanError {
            message: "There's no scan to keep yet.".into(),
            suggestion: "Take a photo of the page first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::InvalidImage(_) | ScanError::Image(_) => HumanError {
            message: "There's a problem with this photo.".into(),
            suggestion: "Tap Retake to scan the page again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::Config(detail) => HumanError {
            message: "The scanner settings are invalid.".into(),
            suggestion: format!("Reset the scanner settings to their defaults. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The photo file couldn't be found.".into(),
                    suggestion: "It may have been removed. Tap Retake to scan the page again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        ScanError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_is_transient() {
        let human = humanize_error(&ScanError::AlreadyInProgress);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn missing_geometry_needs_retake() {
        let human = humanize_error(&ScanError::MissingGeometry);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    /// A timed-out call is worth retrying; an absent backend is not, even
    /// when its reason mentions a timeout.
    #[test]
    fn timeout_differs_from_absent_service() {
        let timed_out = humanize_error(&ScanError::ServiceUnavailable(Unavailable::TimedOut(
            std::time::Duration::from_secs(30),
        )));
        assert_eq!(timed_out.severity, Severity::Transient);
        assert!(timed_out.retriable);

        let absent = humanize_error(&ScanError::ServiceUnavailable("no native module".into()));
        assert_eq!(absent.severity, Severity::Permanent);
        assert!(!absent.retriable);

        let worded = humanize_error(&ScanError::ServiceUnavailable("bridge timed out loading".into()));
        assert_eq!(worded.severity, Severity::Permanent);
    }

    #[test]
    fn nothing_to_commit_is_action_required() {
        let human = humanize_error(&ScanError::NothingToCommit);
        assert_eq!(human.severity, Severity::ActionRequired);
    }
}
