//! CLI definitions for planka-import
//!
//! This module defines the CLI structure using clap's derive macros.
//! Exactly one mode flag selects what the run does.

pub mod connection;

use clap::{ArgGroup, Parser};
use connection::ConnectionArgs;
use std::path::PathBuf;

/// What a run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create the project and import the whole file into it.
    CreateNew,
    /// Merge the file into an existing project.
    MergeLoad,
    /// Write `planka_template.json` and exit.
    GenerateTemplate,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::CreateNew => "create-new",
            Mode::MergeLoad => "merge-load",
            Mode::GenerateTemplate => "generate-template",
        }
    }
}

/// Import JSON into Planka.
#[derive(Parser, Debug)]
#[command(name = "planka-import", author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["create_new", "merge_load", "generate_template"])
))]
pub struct Cli {
    /// The project name
    #[arg(value_name = "PROJECT_NAME", required_unless_present = "generate_template")]
    pub project_name: Option<String>,

    /// The JSON file to load content from
    #[arg(value_name = "FILE_NAME", required_unless_present = "generate_template")]
    pub file_name: Option<PathBuf>,

    /// Set up a new project from the file
    #[arg(short = 'n', long, visible_alias = "new")]
    pub create_new: bool,

    /// Load the file into an existing project
    #[arg(short = 'l', long, visible_alias = "load")]
    pub merge_load: bool,

    /// Generate a JSON template for import into Planka
    #[arg(short = 't', long, visible_alias = "template")]
    pub generate_template: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log level: debug, info, warning, error, or critical
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(long, default_value = "2", value_name = "DEST")]
    pub log: String,

    /// Path to a YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// In merge mode, reuse cards that already exist by name instead of
    /// appending duplicates
    #[arg(long)]
    pub dedupe_cards: bool,
}

impl Cli {
    /// The selected mode. clap guarantees exactly one flag is set.
    pub fn mode(&self) -> Mode {
        if self.generate_template {
            Mode::GenerateTemplate
        } else if self.merge_load {
            Mode::MergeLoad
        } else {
            Mode::CreateNew
        }
    }
}
