mod cache;
mod coordinates;
mod domains;
mod error;
mod service;
#[cfg(test)]
mod test_support;
mod utils;

pub use cache::*;
pub use coordinates::*;
pub use domains::*;
pub use error::*;
pub use service::*;
pub use utils::*;
