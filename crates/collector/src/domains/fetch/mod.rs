mod archive;
mod orchestrator;
mod retry;
mod window;

pub use archive::*;
pub use orchestrator::*;
pub use retry::*;
pub use window::*;
