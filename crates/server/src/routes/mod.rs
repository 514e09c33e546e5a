pub mod dust;

pub use dust::*;
