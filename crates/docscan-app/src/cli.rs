// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docscan_core::types::{Corners, Point};

#[derive(Debug, Parser)]
#[command(name = "docscan", version, about = "Document scan re-crop driver")]
pub struct Cli {
    /// Configuration file (defaults to the data directory's config.json).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Re-crop an image along four corners and commit the result.
    Recrop {
        /// Source image on disk.
        #[arg(long)]
        image: PathBuf,

        /// Corners as "x,y x,y x,y x,y", clockwise from top-left.
        #[arg(long, value_parser = parse_corners)]
        corners: Corners,

        /// Output quality in (0, 1]; the configured default otherwise.
        #[arg(long)]
        quality: Option<f32>,

        /// Where to write the re-cropped JPEG.
        #[arg(long, default_value = "recropped.jpg")]
        out: PathBuf,
    },
    /// Print the effective configuration.
    Config,
}

/// Parse `"x,y x,y x,y x,y"` into clockwise corners.
pub fn parse_corners(raw: &str) -> Result<Corners, String> {
    let points = raw
        .split_whitespace()
        .map(parse_point)
        .collect::<Result<Vec<_>, _>>()?;
    let [top_left, top_right, bottom_right, bottom_left]: [Point; 4] = points
        .try_into()
        .map_err(|v: Vec<Point>| format!("expected 4 points, got {}", v.len()))?;
    Ok(Corners::new(top_left, top_right, bottom_right, bottom_left))
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("point {raw:?} is not x,y"))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|err| format!("bad coordinate {s:?}: {err}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}
