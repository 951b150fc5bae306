//! Command line definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect, create and export DesignDraw documents.
#[derive(Debug, Parser)]
#[command(name = "designdraw", version, about)]
pub struct Cli {
    /// Engine configuration file (JSON). Missing files fall back to defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print object counts, content bounds and canvas extent.
    Info {
        file: PathBuf,
    },
    /// Render a document to PNG.
    Export {
        file: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// TrueType/OpenType font used for text objects.
        #[arg(long)]
        font: Option<PathBuf>,
    },
    /// Write an empty document.
    New {
        file: PathBuf,
    },
    /// Store a document in the autosave area.
    Autosave {
        file: PathBuf,
    },
    /// Write the most recent autosave to a file.
    Restore {
        output: PathBuf,
    },
}
