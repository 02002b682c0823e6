use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const DEFAULT_LIBRARY_FILE: &str = "library.json";
pub const DEFAULT_EXPORT_FILE: &str = "library_export.txt";

/// book-shelf - personal book library manager
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the library JSON file
    #[arg(short, long, env = "BOOKSHELF_FILE", default_value = DEFAULT_LIBRARY_FILE)]
    pub file: PathBuf,

    /// Path the plain-text export is written to
    #[arg(short, long, env = "BOOKSHELF_EXPORT", default_value = DEFAULT_EXPORT_FILE)]
    pub export_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Interactive text menu (default)
    Menu,
    /// Serve the library as MCP tools over stdio
    Mcp,
}

/// ホストに渡す実行時設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub library_path: PathBuf,
    pub export_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_path: PathBuf::from(DEFAULT_LIBRARY_FILE),
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            library_path: cli.file.clone(),
            export_path: cli.export_file.clone(),
        }
    }
}
