pub mod dto;
mod error;
