//! Command-line argument parsing and the one-shot session they drive.

pub mod definition;
pub mod run;

pub use definition::{Args, determine_log_level};
pub use run::{print_sections, run};
