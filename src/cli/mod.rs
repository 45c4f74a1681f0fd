//! CLI argument parsing and command handling.

mod args;
pub mod help;
pub mod pages;
pub mod species;
mod validators;

pub use args::{AnalyzeArgs, Cli, Command, ConfigAction, ModelsAction, Page};
