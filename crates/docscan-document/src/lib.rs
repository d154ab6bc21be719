// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-document: local perspective correction for hosts without a native
// scanner module.
//
// Decodes the service input (bare base64 or a file reference), warps the
// detected quadrilateral onto an upright rectangle, and re-encodes the result
// as JPEG.

pub mod codec;
pub mod service;
pub mod warp;

pub use service::LocalPerspectiveService;
