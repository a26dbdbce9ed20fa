pub mod definition;
pub mod keyword;

pub use definition::*;
pub use keyword::*;
