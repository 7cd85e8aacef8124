use std::ops::Range;
use std::path::{Path, PathBuf};

use clap::Parser;

pub const SAMPLES: usize = 200;
pub const SEED: u64 = 42;
pub const TARGET_MAE: f64 = 3.0;
pub const BASE_NOISE_STD: f64 = 2.0;
pub const ACTUAL_RANGE: Range<f64> = 10.0..30.0;
/// Overview charts only draw error segments for the first points.
pub const HIGHLIGHTED_SEGMENTS: usize = 20;
pub const DPI: u32 = 300;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[clap(short, long, default_value = "img")]
    pub output_dir: PathBuf,

    #[clap(short, long, default_value_t = SEED)]
    pub seed: u64,

    #[clap(short = 'n', long, default_value_t = SAMPLES)]
    pub samples: usize,

    #[clap(short, long, default_value_t = DPI)]
    pub dpi: u32,
}

/// Physical figure sizes, translated to pixels at a given DPI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureGeometry {
    pub dpi: u32,
}

impl Default for FigureGeometry {
    fn default() -> Self {
        FigureGeometry { dpi: DPI }
    }
}

impl FigureGeometry {
    const OVERVIEW_INCHES: (f64, f64) = (8., 6.);
    const GRID_INCHES: (f64, f64) = (14., 12.);

    pub fn new(dpi: u32) -> Self {
        FigureGeometry { dpi: dpi.max(1) }
    }

    /// Typographic points to pixels, never below one pixel.
    pub fn px(&self, points: f64) -> u32 {
        ((points * self.dpi as f64 / 72.).round() as u32).max(1)
    }

    fn inches(&self, (w, h): (f64, f64)) -> (u32, u32) {
        let dpi = self.dpi as f64;
        ((w * dpi).round() as u32, (h * dpi).round() as u32)
    }

    pub fn overview_size(&self) -> (u32, u32) {
        self.inches(Self::OVERVIEW_INCHES)
    }

    pub fn grid_size(&self) -> (u32, u32) {
        self.inches(Self::GRID_INCHES)
    }
}

/// `img/` for the standard orientation, `img/alternative/` for the swapped
/// axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub alternative: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let alternative = root.join("alternative");

        OutputLayout { root, alternative }
    }

    pub fn prepare(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(&self.alternative)?;

        Ok(())
    }
}
