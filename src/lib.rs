//! docs-reorganizer - one-shot reorganization of a documentation tree
//!
//! This library copies the contents of old documentation folders into their new
//! names, relocates loose files into target subfolders, and moves the files of
//! system folders into a nested layout. Every step is driven by ordered mapping
//! tables that can be loaded from a TOML configuration file.

pub mod cli;
pub mod config;
pub mod output;
pub mod reorganizer;

pub use config::{ConfigError, Mapping, ReorganizeConfig};
pub use reorganizer::{Outcome, ReorganizeError, Reorganizer, RunReport, Warning};

pub use cli::{CliArgs, CliError, run_cli};
