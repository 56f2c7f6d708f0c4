pub mod eaf;
pub mod report;
pub mod tsv;

pub use eaf::*;
pub use report::*;
pub use tsv::*;
