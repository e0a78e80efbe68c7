pub mod api;
pub mod configuration;
pub mod domain;
pub mod github;
pub mod schedule;
pub mod startup;
pub mod structure;

pub use configuration::*;
pub use domain::*;
pub use github::*;
pub use startup::*;
pub use structure::*;
