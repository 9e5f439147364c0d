mod paths;
mod staged;

pub use paths::*;
pub use staged::*;
