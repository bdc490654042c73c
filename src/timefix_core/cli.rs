use clap::Parser;
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fix file timestamps using EXIF data or OS creation time")]
pub struct Cli {
    /// File or directory paths to process
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Set file modification time to the resolved timestamp
    #[arg(long)]
    pub set_timestamp: bool,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Recursively process directories
    #[arg(short, long)]
    pub recursive: bool,

    /// Only process files with these extensions (e.g. jpg png). Default: all files
    #[arg(long, num_args = 1..)]
    pub extensions: Option<Vec<String>>,

    /// Enable file logging to timefix.log
    #[arg(long = "log")]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug)]
    pub log_level: LevelFilter,
}
