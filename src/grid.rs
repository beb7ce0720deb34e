//! Loading 0/1 grids from JSON, plain text and bitmap images.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use image::DynamicImage;

/// Errors raised while building a [`BinaryGrid`].
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Jagged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell ({row}, {col}) is {value}, expected 0 or 1")]
    InvalidCell { row: usize, col: usize, value: i64 },

    #[error("unexpected character {ch:?} on line {line}")]
    InvalidChar { line: usize, ch: char },

    #[error("cell size must be at least one pixel")]
    InvalidCellSize,

    #[error("invalid grid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Input encoding of a grid file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GridFormat {
    Json,
    Text,
    Image,
}

impl GridFormat {
    /// Format for a recognised grid extension, `None` for anything else.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(OsStr::to_str)?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(GridFormat::Json),
            "txt" => Some(GridFormat::Text),
            "png" | "jpg" | "jpeg" | "bmp" | "gif" | "tif" | "tiff" | "webp" => {
                Some(GridFormat::Image)
            }
            _ => None,
        }
    }

    /// Guess the format from the file extension. Unknown extensions are read as text.
    pub fn from_path(path: &Path) -> Self {
        Self::from_extension(path).unwrap_or(GridFormat::Text)
    }
}

/// How an image is reduced to cells.
#[derive(Debug, Clone)]
pub struct ImageGridConfig {
    /// Width and height in pixels of one grid cell.
    pub cell_px: u32,
    /// Luma at or below which a pixel counts as dark. `None` picks one with Otsu's method.
    pub threshold: Option<u8>,
}

impl Default for ImageGridConfig {
    fn default() -> Self {
        Self {
            cell_px: 1,
            threshold: None,
        }
    }
}

/// A non-empty rectangular grid whose cells are all 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryGrid {
    cells: Vec<Vec<u8>>,
}

impl BinaryGrid {
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, |r| r.len());
        if width == 0 {
            return Err(GridError::Empty);
        }
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::Jagged {
                    row: r,
                    expected: width,
                    found: row.len(),
                });
            }
            if let Some(c) = row.iter().position(|&v| v > 1) {
                return Err(GridError::InvalidCell {
                    row: r,
                    col: c,
                    value: row[c] as i64,
                });
            }
        }
        Ok(Self { cells: rows })
    }

    /// Parse a JSON array of arrays of 0/1 integers.
    pub fn from_json_str(s: &str) -> Result<Self, GridError> {
        let raw: Vec<Vec<i64>> = serde_json::from_str(s)?;
        let mut rows = Vec::with_capacity(raw.len());
        for (r, row) in raw.into_iter().enumerate() {
            let mut out = Vec::with_capacity(row.len());
            for (c, value) in row.into_iter().enumerate() {
                match value {
                    0 | 1 => out.push(value as u8),
                    _ => return Err(GridError::InvalidCell { row: r, col: c, value }),
                }
            }
            rows.push(out);
        }
        Self::from_rows(rows)
    }

    /// Parse one row per line. Whitespace, commas and brackets are ignored,
    /// and lines without any cell are skipped.
    pub fn from_text(s: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (idx, line) in s.lines().enumerate() {
            let mut row = Vec::new();
            for ch in line.chars() {
                match ch {
                    '0' => row.push(0),
                    '1' => row.push(1),
                    ',' | '[' | ']' => {}
                    c if c.is_whitespace() => {}
                    c => return Err(GridError::InvalidChar { line: idx + 1, ch: c }),
                }
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }
        Self::from_rows(rows)
    }

    /// Binarize an image: dark pixels are 1, and each `cell_px` block becomes
    /// one cell set to the majority of its pixels. Partial trailing blocks are dropped.
    pub fn from_image(source: &DynamicImage, config: &ImageGridConfig) -> Result<Self, GridError> {
        if config.cell_px == 0 {
            return Err(GridError::InvalidCellSize);
        }

        let gray = source.to_luma8();
        let (width, height) = gray.dimensions();
        let cols = (width / config.cell_px) as usize;
        let rows = (height / config.cell_px) as usize;
        if cols == 0 || rows == 0 {
            return Err(GridError::Empty);
        }
        if width % config.cell_px != 0 || height % config.cell_px != 0 {
            tracing::warn!(
                width,
                height,
                cell_px = config.cell_px,
                "image size is not a multiple of the cell size; trailing pixels dropped"
            );
        }

        let threshold = config
            .threshold
            .unwrap_or_else(|| otsu_threshold(gray.as_raw()));
        tracing::debug!(threshold, rows, cols, "binarizing image");

        let cell = config.cell_px as usize;
        let mut dark = vec![vec![0usize; cols]; rows];
        for (x, y, px) in gray.enumerate_pixels() {
            let (c, r) = (x as usize / cell, y as usize / cell);
            if r < rows && c < cols && px[0] <= threshold {
                dark[r][c] += 1;
            }
        }

        let block = cell * cell;
        let cells = dark
            .into_iter()
            .map(|row| row.into_iter().map(|n| u8::from(n * 2 > block)).collect())
            .collect();
        Self::from_rows(cells)
    }

    /// Read a grid file in the given format, or the one its extension suggests.
    pub fn load(
        path: &Path,
        format: Option<GridFormat>,
        config: &ImageGridConfig,
    ) -> Result<Self, GridError> {
        match format.unwrap_or_else(|| GridFormat::from_path(path)) {
            GridFormat::Json => Self::from_json_str(&fs::read_to_string(path)?),
            GridFormat::Text => Self::from_text(&fs::read_to_string(path)?),
            GridFormat::Image => Self::from_image(&image::open(path)?, config),
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells[0].len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get(row)?.get(col).copied()
    }

    pub fn as_rows(&self) -> &[Vec<u8>] {
        &self.cells
    }
}

/// JSON array with one grid row per line, so binarized images stay readable.
pub fn write_grid_json_string(grid: &[Vec<u8>]) -> String {
    if grid.is_empty() {
        return "[]".to_string();
    }
    let rows: Vec<String> = grid
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(u8::to_string).collect();
            format!("  [{}]", cells.join(", "))
        })
        .collect();
    format!("[\n{}\n]", rows.join(",\n"))
}

/// Threshold used when every pixel has the same luma: dark flat images
/// become all 1s and light ones all 0s.
const FLAT_IMAGE_THRESHOLD: u8 = 127;

fn otsu_threshold(pixels: &[u8]) -> u8 {
    let mut histogram = [0u32; 256];
    for &value in pixels {
        histogram[value as usize] += 1;
    }

    if histogram.iter().filter(|&&count| count > 0).count() <= 1 {
        return FLAT_IMAGE_THRESHOLD;
    }

    let total_pixels = pixels.len() as f64;
    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut sum_background = 0f64;
    let mut weight_background = 0f64;
    let mut max_variance = f64::MIN;
    let mut threshold = 0u8;

    for (value, &count) in histogram.iter().enumerate() {
        weight_background += count as f64;
        if weight_background == 0.0 {
            continue;
        }

        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0.0 {
            break;
        }

        sum_background += value as f64 * count as f64;

        let mean_background = sum_background / weight_background;
        let mean_foreground = (sum_total - sum_background) / weight_foreground;
        let variance =
            weight_background * weight_foreground * (mean_background - mean_foreground).powi(2);

        if variance > max_variance {
            max_variance = variance;
            threshold = value as u8;
        }
    }

    threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otsu_splits_two_levels() {
        let mut pixels = vec![20u8; 50];
        pixels.extend(std::iter::repeat_n(230u8, 50));
        let t = otsu_threshold(&pixels);
        assert!((20..230).contains(&t), "threshold {t}");
    }

    #[test]
    fn otsu_flat_image_uses_midpoint() {
        assert_eq!(otsu_threshold(&[255u8; 16]), FLAT_IMAGE_THRESHOLD);
        assert_eq!(otsu_threshold(&[5u8; 16]), FLAT_IMAGE_THRESHOLD);
        assert_eq!(otsu_threshold(&[]), FLAT_IMAGE_THRESHOLD);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(GridFormat::from_path(Path::new("a.JSON")), GridFormat::Json);
        assert_eq!(GridFormat::from_path(Path::new("a.png")), GridFormat::Image);
        assert_eq!(GridFormat::from_path(Path::new("a.txt")), GridFormat::Text);
        assert_eq!(GridFormat::from_path(Path::new("grid")), GridFormat::Text);
        assert_eq!(GridFormat::from_extension(Path::new("README.md")), None);
        assert_eq!(GridFormat::from_extension(Path::new("grid")), None);
    }

    #[test]
    fn json_writer_one_row_per_line() {
        let s = write_grid_json_string(&[vec![1, 0], vec![0, 1]]);
        assert_eq!(s, "[\n  [1, 0],\n  [0, 1]\n]");
        assert_eq!(write_grid_json_string(&[]), "[]");
    }
}
