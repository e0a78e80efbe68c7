mod error;
mod resolver;
mod tree;

pub use error::*;
pub use resolver::*;
pub use tree::*;
