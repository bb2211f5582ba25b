pub mod cell;
pub mod grid;
pub mod table;

pub use cell::Cell;
pub use grid::{Layout, RawGrid};
pub use table::{ColumnValue, OutputRow, ScoreTable};
