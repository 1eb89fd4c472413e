mod enums;
mod state;
mod tier;

pub use enums::*;
pub use state::*;
pub use tier::*;
