//! Run-length tables that turn each border check into four lookups.

use crate::border_square::BorderedSquare;

/// Per-cell counts of consecutive 1s, the cell itself included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLengths {
    right: Vec<Vec<usize>>,
    down: Vec<Vec<usize>>,
}

impl RunLengths {
    pub fn new(grid: &[Vec<u8>]) -> Self {
        let n = grid.len();
        let m = grid.first().map_or(0, |r| r.len());
        let mut right = vec![vec![0usize; m]; n];
        let mut down = vec![vec![0usize; m]; n];

        for i in (0..n).rev() {
            for j in (0..m).rev() {
                if grid[i][j] != 1 {
                    continue;
                }
                right[i][j] = 1 + if j + 1 < m { right[i][j + 1] } else { 0 };
                down[i][j] = 1 + if i + 1 < n { down[i + 1][j] } else { 0 };
            }
        }

        Self { right, down }
    }

    pub fn right(&self, row: usize, col: usize) -> usize {
        self.right[row][col]
    }

    pub fn down(&self, row: usize, col: usize) -> usize {
        self.down[row][col]
    }

    /// True when the `side`-wide square with top-left `(row, col)` has an all-1 border.
    pub fn has_border(&self, row: usize, col: usize, side: usize) -> bool {
        let last = side - 1;
        self.right[row][col] >= side
            && self.down[row][col] >= side
            && self.down[row][col + last] >= side
            && self.right[row + last][col] >= side
    }
}

/// Same result as [`crate::border_square::find_largest_bordered_square`],
/// including the chosen position, in `O(rows * cols * min(rows, cols))`.
pub fn find_largest_bordered_square_fast(grid: &[Vec<u8>]) -> Option<BorderedSquare> {
    let n = grid.len();
    let m = grid.first().map_or(0, |r| r.len());
    if n == 0 || m == 0 {
        return None;
    }

    let runs = RunLengths::new(grid);
    for k in (1..=n.min(m)).rev() {
        for i in 0..=(n - k) {
            for j in 0..=(m - k) {
                if runs.has_border(i, j, k) {
                    tracing::debug!(
                        row = i,
                        col = j,
                        side = k,
                        "bordered square found from run lengths"
                    );
                    return Some(BorderedSquare { row: i, col: j, side: k });
                }
            }
        }
    }

    None
}

pub fn largest_bordered_square_area_fast(grid: &[Vec<u8>]) -> usize {
    find_largest_bordered_square_fast(grid).map_or(0, |s| s.area())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_lengths_count_consecutive_ones() {
        let grid = vec![vec![1, 1, 0, 1], vec![1, 0, 1, 1], vec![1, 1, 1, 1]];
        let runs = RunLengths::new(&grid);

        assert_eq!(runs.right(0, 0), 2);
        assert_eq!(runs.right(0, 2), 0);
        assert_eq!(runs.right(2, 0), 4);
        assert_eq!(runs.down(0, 0), 3);
        assert_eq!(runs.down(0, 1), 1);
        assert_eq!(runs.down(0, 3), 3);
    }

    #[test]
    fn has_border_ignores_interior() {
        let grid = vec![vec![1, 1, 1], vec![1, 0, 1], vec![1, 1, 1]];
        let runs = RunLengths::new(&grid);
        assert!(runs.has_border(0, 0, 3));
        assert!(!runs.has_border(0, 0, 2));
        assert!(!runs.has_border(1, 1, 1));
    }
}
