// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral-to-rectangle perspective warp.

use docscan_core::error::{Result, ScanError};
use docscan_core::types::Corners;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, instrument};

/// Largest edge we will allocate for a corrected page.
pub const MAX_OUTPUT_EDGE: u32 = 16_384;

/// Quadrilaterals smaller than this (in square pixels) are rejected.
const MIN_QUAD_AREA: f64 = 1.0;

/// How far a corner may sit outside the source, as a fraction of the
/// image's longer side. Detectors overshoot the frame edge slightly.
const CORNER_MARGIN: f64 = 0.1;

/// Size of the upright rectangle the quadrilateral maps onto.
///
/// Width is the longer of the top and bottom edges, height the longer of
/// the left and right edges, so no side of the page is downsampled.
pub fn output_size(corners: &Corners) -> (u32, u32) {
    let width = corners
        .top_left
        .distance(&corners.top_right)
        .max(corners.bottom_left.distance(&corners.bottom_right));
    let height = corners
        .top_left
        .distance(&corners.bottom_left)
        .max(corners.top_right.distance(&corners.bottom_right));
    (to_edge(width), to_edge(height))
}

fn to_edge(length: f64) -> u32 {
    length.round().clamp(1.0, MAX_OUTPUT_EDGE as f64) as u32
}

/// Warp the region bounded by `corners` onto an upright rectangle.
#[instrument(skip(image, corners), fields(width = image.width(), height = image.height()))]
pub fn warp_to_rectangle(image: &DynamicImage, corners: &Corners) -> Result<RgbImage> {
    if !corners.is_finite() {
        return Err(ScanError::Image("corners contain non-finite coordinates".into()));
    }
    check_within_source(corners, image.width(), image.height())?;
    let area = shoelace_area(corners);
    if area < MIN_QUAD_AREA {
        return Err(ScanError::Image(format!(
            "corners enclose a degenerate region (area {area:.2})"
        )));
    }

    let (out_w, out_h) = output_size(corners);

    let src = corners.as_array().map(|p| (p.x as f32, p.y as f32));
    let dest: [(f32, f32); 4] = [
        (0.0, 0.0),                   // top-left
        (out_w as f32, 0.0),          // top-right
        (out_w as f32, out_h as f32), // bottom-right
        (0.0, out_h as f32),          // bottom-left
    ];

    let projection = Projection::from_control_points(src, dest)
        .ok_or_else(|| ScanError::Image("projective transform not computable for corners".into()))?;

    let input = image.to_rgb8();
    let mut output = RgbImage::new(out_w, out_h);
    warp_into(
        &input,
        &projection,
        Interpolation::Bilinear,
        Rgb([255u8, 255, 255]),
        &mut output,
    );

    debug!(out_w, out_h, area, "perspective warp applied");
    Ok(output)
}

/// Reject corners lying beyond the source image plus the margin.
///
/// The output canvas is sized from the corner distances, so this also bounds
/// it to roughly the source diagonal.
fn check_within_source(corners: &Corners, width: u32, height: u32) -> Result<()> {
    let margin = (f64::from(width.max(height)) * CORNER_MARGIN).max(1.0);
    let (min_x, max_x) = (-margin, f64::from(width) + margin);
    let (min_y, max_y) = (-margin, f64::from(height) + margin);
    for p in corners.as_array() {
        if p.x < min_x || p.x > max_x || p.y < min_y || p.y > max_y {
            return Err(ScanError::Image(format!(
                "corner ({:.1}, {:.1}) lies outside the {width}x{height} source",
                p.x, p.y
            )));
        }
    }
    Ok(())
}

/// Absolute polygon area of the quadrilateral.
fn shoelace_area(corners: &Corners) -> f64 {
    let points = corners.as_array();
    let mut area = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::types::Point;

    fn corners(points: [(f64, f64); 4]) -> Corners {
        Corners::new(
            Point::new(points[0].0, points[0].1),
            Point::new(points[1].0, points[1].1),
            Point::new(points[2].0, points[2].1),
            Point::new(points[3].0, points[3].1),
        )
    }

    /// White 100x100 canvas with a black square from (20, 20) to (80, 80).
    fn page_on_white() -> DynamicImage {
        let mut img = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        for y in 20..80 {
            for x in 20..80 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    /// Output size takes the longer of each pair of opposite edges.
    #[test]
    fn output_size_uses_longest_edges() {
        let c = corners([(10.0, 10.0), (90.0, 20.0), (80.0, 90.0), (20.0, 80.0)]);
        // Top edge hypot(80, 10) ~ 80.6, bottom hypot(60, 10) ~ 60.8.
        // Left and right are both hypot(10, 70) ~ 70.7.
        assert_eq!(output_size(&c), (81, 71));
    }

    #[test]
    fn output_size_never_zero() {
        let c = corners([(5.0, 5.0), (5.0, 5.0), (5.0, 5.0), (5.0, 5.0)]);
        assert_eq!(output_size(&c), (1, 1));
    }

    #[test]
    fn shoelace_area_rectangle() {
        let c = corners([(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0)]);
        assert!((shoelace_area(&c) - 50.0).abs() < 1e-9);
    }

    /// Warping an axis-aligned square crops exactly that square.
    #[test]
    fn warp_extracts_the_page_region() {
        let c = corners([(20.0, 20.0), (80.0, 20.0), (80.0, 80.0), (20.0, 80.0)]);
        let out = warp_to_rectangle(&page_on_white(), &c).expect("warp");
        assert_eq!(out.dimensions(), (60, 60));
        // The interior of the page is black.
        assert!(out.get_pixel(30, 30).0[0] < 50);
    }

    #[test]
    fn collinear_corners_are_rejected() {
        let c = corners([(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)]);
        let result = warp_to_rectangle(&page_on_white(), &c);
        assert!(matches!(result, Err(ScanError::Image(_))));
    }

    /// Corners far outside a tiny source must not size a huge canvas.
    #[test]
    fn far_out_corners_are_rejected() {
        let tiny = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
        let c = corners([(0.0, 0.0), (6000.0, 0.0), (6000.0, 6000.0), (0.0, 6000.0)]);
        assert!(matches!(warp_to_rectangle(&tiny, &c), Err(ScanError::Image(_))));
    }

    /// A slight overshoot past the frame edge is still warped.
    #[test]
    fn corners_within_margin_are_accepted() {
        let c = corners([(-5.0, -5.0), (105.0, -5.0), (105.0, 105.0), (-5.0, 105.0)]);
        let out = warp_to_rectangle(&page_on_white(), &c).expect("warp");
        assert_eq!(out.dimensions(), (110, 110));
    }

    #[test]
    fn non_finite_corners_are_rejected() {
        let c = corners([(0.0, 0.0), (f64::INFINITY, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert!(warp_to_rectangle(&page_on_white(), &c).is_err());
    }
}
