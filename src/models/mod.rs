mod artifact;
mod manifest;

pub use artifact::*;
pub use manifest::*;
