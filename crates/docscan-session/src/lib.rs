// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-session: scan session state, image reference normalization, and
// the single-flight re-crop coordinator that sits between the review screen
// and the perspective transform bridge.

pub mod coordinator;
pub mod normalize;
pub mod session;

pub use coordinator::{RecropCoordinator, RecropSettings};
pub use session::{ScanSession, SessionPhase, SessionSnapshot};
