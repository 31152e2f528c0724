pub mod log;
pub mod migrate;
pub mod stats;
pub mod workbook;

pub use workbook::{CellRange, FontWeight, Sheet, Workbook};
