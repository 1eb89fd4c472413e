mod keeper;
mod store;

pub use keeper::*;
pub use store::*;
