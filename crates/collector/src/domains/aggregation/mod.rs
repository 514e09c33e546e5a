mod map;
mod summary;
mod table;
mod wind_rose;

pub use map::*;
pub use summary::*;
pub use table::*;
pub use wind_rose::*;
