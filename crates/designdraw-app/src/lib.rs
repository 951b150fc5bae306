//! DesignDraw App Library
//!
//! Command line host around the core engine and the raster renderer.

pub mod cli;
mod commands;

pub use cli::{Cli, Command};
pub use commands::{autosave_document, describe, export_document, restore_last, run};

use designdraw_core::storage::StorageError;
use designdraw_core::{ConfigError, DocumentError};
use designdraw_render::{InvalidFont, RendererError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Invalid font {}", .0.display())]
    Font(PathBuf, #[source] InvalidFont),
    #[error("No autosaved document found")]
    NothingToRestore,
}

pub type AppResult<T> = Result<T, AppError>;
