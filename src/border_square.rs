//! Brute-force search for the largest square whose border cells are all 1.

use serde::Serialize;

use crate::run_lengths::find_largest_bordered_square_fast;

/// A square sub-region of a grid, addressed by its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BorderedSquare {
    pub row: usize,
    pub col: usize,
    pub side: usize,
}

impl BorderedSquare {
    pub fn area(&self) -> usize {
        self.side * self.side
    }

    /// Returns true when `(row, col)` lies on this square's boundary.
    pub fn contains_border(&self, row: usize, col: usize) -> bool {
        if self.side == 0 {
            return false;
        }
        let bottom = self.row + self.side - 1;
        let right = self.col + self.side - 1;
        let inside = (self.row..=bottom).contains(&row) && (self.col..=right).contains(&col);
        inside && (row == self.row || row == bottom || col == self.col || col == right)
    }

    /// Every boundary cell, each visited once, clockwise from the top-left corner.
    pub fn border_cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let k = self.side;
        let (r0, c0) = (self.row, self.col);
        let top = (0..k).map(move |d| (r0, c0 + d));
        let right = (1..k).map(move |d| (r0 + d, c0 + k - 1));
        let bottom = (1..k).map(move |d| (r0 + k - 1, c0 + k - 1 - d));
        let left = (1..k.saturating_sub(1)).map(move |d| (r0 + k - 1 - d, c0));
        top.chain(right).chain(bottom).chain(left)
    }
}

/// Search strategy used to locate the square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Walks each candidate border cell by cell.
    #[default]
    BruteForce,
    /// Precomputes run lengths so each border check is constant time.
    RunLength,
}

impl Strategy {
    pub fn find(self, grid: &[Vec<u8>]) -> Option<BorderedSquare> {
        match self {
            Strategy::BruteForce => find_largest_bordered_square(grid),
            Strategy::RunLength => find_largest_bordered_square_fast(grid),
        }
    }
}

/// Area of the largest square whose top row, bottom row, left column and
/// right column are all 1, or 0 when no cell is 1.
///
/// The grid must be rectangular; rows are not validated here.
pub fn largest_bordered_square_area(grid: &[Vec<u8>]) -> usize {
    find_largest_bordered_square(grid).map_or(0, |s| s.area())
}

/// Same search as [`largest_bordered_square_area`], returning the winning square.
///
/// Sides are tried from `min(rows, cols)` down to 1 and positions in row-major
/// order, so the first hit is the largest square and the top-most, left-most
/// one among squares of that size.
pub fn find_largest_bordered_square(grid: &[Vec<u8>]) -> Option<BorderedSquare> {
    let n = grid.len();
    let m = grid.first().map_or(0, |r| r.len());

    for k in (1..=n.min(m)).rev() {
        for i in 0..=(n - k) {
            for j in 0..=(m - k) {
                if border_is_all_ones(grid, i, j, k) {
                    tracing::debug!(row = i, col = j, side = k, "bordered square found");
                    return Some(BorderedSquare { row: i, col: j, side: k });
                }
            }
        }
    }

    None
}

fn border_is_all_ones(grid: &[Vec<u8>], i: usize, j: usize, k: usize) -> bool {
    let last = k - 1;
    (0..k).all(|d| {
        grid[i][j + d] == 1
            && grid[i + last][j + d] == 1
            && grid[i + d][j] == 1
            && grid[i + d][j + last] == 1
    })
}
