// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for image reference normalization. Captures arrive as
// multi-megabyte base64 strings, so prefix handling is measured on a payload
// of realistic size.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use docscan_core::types::{ImageReference, ServiceOutput};
use docscan_session::normalize::{to_displayable, to_service_input};

/// Roughly the base64 size of a 12 MP JPEG at quality 0.8.
const PAYLOAD_LEN: usize = 4 * 1024 * 1024;

fn bench_normalize(c: &mut Criterion) {
    let payload = "A".repeat(PAYLOAD_LEN);
    let data_uri = ImageReference::inline(&payload, "image/jpeg");

    c.bench_function("to_service_input (4 MiB data URI)", |b| {
        b.iter(|| black_box(to_service_input(black_box(&data_uri))))
    });

    c.bench_function("to_displayable (4 MiB bare payload)", |b| {
        b.iter(|| {
            let output = ServiceOutput::new(black_box(payload.as_str()));
            black_box(to_displayable(output, "image/jpeg"))
        })
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
