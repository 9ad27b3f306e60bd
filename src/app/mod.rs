//! Application module

pub mod cli;
mod error;
pub mod startup;

pub use error::AppError;
