mod file_node;
mod repository_info;
mod repository_reference;

pub use file_node::*;
pub use repository_info::*;
pub use repository_reference::*;
