// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer. Wires configuration, the transform backend, and the
// re-crop coordinator together for the command line front end.

pub mod data_dir;
pub mod review;
