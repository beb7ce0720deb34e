//! Draws a grid as a bitmap with the bordered square highlighted.

use image::{Rgba, RgbaImage};

use crate::border_square::BorderedSquare;

const COLOR_ONE: Rgba<u8> = Rgba([40, 40, 40, 255]);
const COLOR_ZERO: Rgba<u8> = Rgba([255, 255, 255, 255]);
const COLOR_HIGHLIGHT: Rgba<u8> = Rgba([230, 130, 30, 255]);
const COLOR_GRID_LINE: Rgba<u8> = Rgba([200, 200, 200, 255]);

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub cell_px: u32,
    pub one: Rgba<u8>,
    pub zero: Rgba<u8>,
    pub highlight: Rgba<u8>,
    /// Colour of the one-pixel separator drawn around every cell; `None` disables it.
    pub grid_line: Option<Rgba<u8>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_px: 16,
            one: COLOR_ONE,
            zero: COLOR_ZERO,
            highlight: COLOR_HIGHLIGHT,
            grid_line: Some(COLOR_GRID_LINE),
        }
    }
}

/// Render `grid` with each cell as a `cell_px` block. Border cells of `square`
/// take the highlight colour.
pub fn render_square(
    grid: &[Vec<u8>],
    square: Option<&BorderedSquare>,
    config: &RenderConfig,
) -> RgbaImage {
    let rows = grid.len() as u32;
    let cols = grid.first().map_or(0, |r| r.len()) as u32;
    let cell = config.cell_px.max(1);
    let mut canvas = RgbaImage::from_pixel(cols * cell, rows * cell, config.zero);

    for (r, row) in grid.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let color = match square {
                Some(sq) if sq.contains_border(r, c) => config.highlight,
                _ if value == 1 => config.one,
                _ => config.zero,
            };
            fill_cell(&mut canvas, r as u32, c as u32, cell, color, config.grid_line);
        }
    }

    canvas
}

fn fill_cell(
    canvas: &mut RgbaImage,
    row: u32,
    col: u32,
    cell: u32,
    color: Rgba<u8>,
    grid_line: Option<Rgba<u8>>,
) {
    let (x0, y0) = (col * cell, row * cell);
    for dy in 0..cell {
        for dx in 0..cell {
            let on_edge = dx == 0 || dy == 0 || dx == cell - 1 || dy == cell - 1;
            let px = match grid_line {
                Some(line) if on_edge && cell > 2 => line,
                _ => color,
            };
            canvas.put_pixel(x0 + dx, y0 + dy, px);
        }
    }
}
