mod classifier;
mod observation;
mod parser;

pub use classifier::*;
pub use observation::*;
pub use parser::*;
