mod builder;
mod country;
mod units;

pub use builder::*;
pub use country::*;
pub use units::*;
