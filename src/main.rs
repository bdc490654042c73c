use anyhow::Result;
use clap::Parser;
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;
use timefix::timefix_core::process::{ProcessOptions, collect_files, process_file};
use timefix::timefix_core::{Cli, TimestampResolver, detect_extractors};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("timefix.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    // Capability detection happens once, up front. Running with no
    // extractor at all is a configuration error, not a per-file one.
    let mut resolver = TimestampResolver::new(detect_extractors())?;

    let files = collect_files(&cli.paths, cli.recursive, cli.extensions.as_deref())?;

    println!("Processing {} file(s)...\n", files.len());

    let options = ProcessOptions {
        set_timestamp: cli.set_timestamp,
        dry_run: cli.dry_run,
    };

    for file in &files {
        process_file(&mut resolver, file, options);
    }

    Ok(())
}
