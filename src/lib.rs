pub mod border_square;
pub mod grid;
pub mod logging;
pub mod render;
pub mod run_lengths;

pub use border_square::{
    BorderedSquare, Strategy, find_largest_bordered_square, largest_bordered_square_area,
};
pub use grid::{BinaryGrid, GridError, ImageGridConfig};
pub use run_lengths::{
    RunLengths, find_largest_bordered_square_fast, largest_bordered_square_area_fast,
};
