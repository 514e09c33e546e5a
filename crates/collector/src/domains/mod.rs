pub mod aggregation;
pub mod fetch;
pub mod observations;
pub mod report;

pub use aggregation::*;
pub use fetch::*;
pub use observations::*;
pub use report::*;
