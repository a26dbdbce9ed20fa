pub mod definition;
pub mod metadata;

pub use definition::*;
pub use metadata::*;
