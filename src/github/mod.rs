mod client;
mod error;
mod payload;

pub use client::*;
pub use error::*;
pub use payload::{ContentEntry, EntryKind};
