mod generator;
mod mask;

pub use generator::*;
pub use mask::*;
