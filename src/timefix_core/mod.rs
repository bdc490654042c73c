pub mod cli;
pub mod error;
pub mod exif;
pub mod process;
pub mod resolve;

pub use cli::Cli;
pub use resolve::TimestampResolver;
pub use self::exif::detect_extractors;
