pub mod commands;
mod prompt;
pub mod setup;

pub use commands::run;
