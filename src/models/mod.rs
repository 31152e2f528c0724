pub mod cell;
pub mod column;
pub mod dataset;
pub mod report_kind;

pub use cell::{CellValue, SENTINEL};
pub use column::Column;
pub use dataset::{Dataset, Row, SplitDataset};
pub use report_kind::ReportKind;
