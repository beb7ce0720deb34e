use clap::{ArgGroup, Parser};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bordered_square::grid::{BinaryGrid, GridFormat, ImageGridConfig, write_grid_json_string};
use bordered_square::logging::init_tracing;
use bordered_square::render::{RenderConfig, render_square};
use bordered_square::{BorderedSquare, Strategy};

#[derive(Parser, Debug)]
#[command(
    name = "bordered_square",
    about = "Find the largest square whose border cells are all 1",
    version,
    group(
        ArgGroup::new("input")
            .required(true)
            .multiple(true)
            .args(["files", "dir"])
    )
)]
struct Cli {
    /// Grid files (.json, text, or images)
    files: Vec<PathBuf>,

    /// Directory scanned for grid files (.json, .txt, images)
    #[arg(short = 'd', long = "dir")]
    dir: Option<PathBuf>,

    /// Force the input format instead of guessing from the extension
    #[arg(short = 'f', long = "format", value_enum)]
    format: Option<GridFormat>,

    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::BruteForce)]
    strategy: Strategy,

    /// Print one JSON object per file
    #[arg(long = "json")]
    json: bool,

    /// Write a PNG with the square highlighted
    #[arg(long = "plot", short = 'p')]
    plot: bool,

    /// Write the loaded 0/1 grid as JSON
    #[arg(long = "grid", short = 'g')]
    grid: bool,

    /// Where generated files go; defaults to next to each input
    #[arg(long = "out-dir", short = 'o')]
    out_dir: Option<PathBuf>,

    /// Pixels per grid cell when reading images
    #[arg(long = "cell-px", default_value_t = 1)]
    cell_px: u32,

    /// Fixed luma threshold for images (otherwise Otsu)
    #[arg(long = "threshold")]
    threshold: Option<u8>,

    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    path: &'a str,
    rows: usize,
    cols: usize,
    area: usize,
    square: Option<BorderedSquare>,
}

const PLOT_SUFFIX: &str = "_bordered.png";
const GRID_SUFFIX: &str = "_grid.json";

/// Grid files found in a directory: known extensions only, minus files this tool writes.
fn is_grid_file(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    if name.ends_with(PLOT_SUFFIX) || name.ends_with(GRID_SUFFIX) {
        return false;
    }
    GridFormat::from_extension(path).is_some()
}

fn collect_inputs(cli: &Cli) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut inputs = cli.files.clone();
    if let Some(dir) = &cli.dir {
        if !dir.is_dir() {
            return Err(format!("Not a directory: {}", dir.display()).into());
        }
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_grid_file(p))
            .collect();
        entries.sort();
        inputs.extend(entries);
    }
    Ok(inputs)
}

fn output_path(input: &Path, out_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "grid".to_string());
    let name = format!("{stem}{suffix}");
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

fn ensure_parent(out: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn write_plot(
    grid: &BinaryGrid,
    square: Option<&BorderedSquare>,
    out: &Path,
) -> Result<(), Box<dyn Error>> {
    ensure_parent(out)?;
    render_square(grid.as_rows(), square, &RenderConfig::default()).save(out)?;
    Ok(())
}

fn write_grid(grid: &BinaryGrid, out: &Path) -> Result<(), Box<dyn Error>> {
    ensure_parent(out)?;
    fs::write(out, write_grid_json_string(grid.as_rows()))?;
    Ok(())
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let inputs = collect_inputs(&cli)?;
    if inputs.is_empty() {
        tracing::warn!("no grid files to process");
        return Ok(ExitCode::SUCCESS);
    }

    let image_config = ImageGridConfig {
        cell_px: cli.cell_px,
        threshold: cli.threshold,
    };

    let mut failures = 0usize;
    for path in &inputs {
        let grid = match BinaryGrid::load(path, cli.format, &image_config) {
            Ok(g) => g,
            Err(e) => {
                tracing::error!(path = %path.display(), "failed to load grid: {e}");
                failures += 1;
                continue;
            }
        };

        let square = cli.strategy.find(grid.as_rows());
        let area = square.map_or(0, |s| s.area());
        let shown = path.display().to_string();

        if cli.json {
            let report = Report {
                path: &shown,
                rows: grid.rows(),
                cols: grid.cols(),
                area,
                square,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            match square {
                Some(sq) => println!(
                    "{shown}: area={area} side={} at ({}, {})",
                    sq.side, sq.row, sq.col
                ),
                None => println!("{shown}: area=0"),
            }
        }

        if cli.plot {
            let out = output_path(path, cli.out_dir.as_deref(), PLOT_SUFFIX);
            if let Err(e) = write_plot(&grid, square.as_ref(), &out) {
                tracing::error!(path = %out.display(), "failed to write plot: {e}");
                failures += 1;
            }
        }

        if cli.grid {
            let out = output_path(path, cli.out_dir.as_deref(), GRID_SUFFIX);
            if let Err(e) = write_grid(&grid, &out) {
                tracing::error!(path = %out.display(), "failed to write grid: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        tracing::warn!(failures, total = inputs.len(), "some inputs failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
