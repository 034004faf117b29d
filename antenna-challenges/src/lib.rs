mod grid;
pub use grid::*;
mod instance;
pub use instance::*;
mod placement;
pub use placement::*;
mod scoring;
pub use scoring::*;
mod solution;
pub use solution::*;
mod stats;
pub use stats::*;
