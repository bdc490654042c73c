use crate::timefix_core::error::{Result, TimefixError};
use crate::timefix_core::resolve::{TimestampResolver, set_file_timestamp};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use walkdir::WalkDir;

/// Display format for resolved timestamps.
const REPORT_DATE_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// How a batch run should treat resolved timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Write the resolved timestamp back to the file's mtime/atime.
    pub set_timestamp: bool,
    /// Report what would be written without mutating anything.
    pub dry_run: bool,
}

/// Expand the caller-supplied paths into a sorted worklist of regular
/// files. Nonexistent paths and directories given without `recursive`
/// are warned about and skipped.
pub fn collect_files(
    paths: &[PathBuf],
    recursive: bool,
    extensions: Option<&[String]>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            log::warn!("Path does not exist: {}", path.display());
            continue;
        }

        if path.is_file() {
            if matches_extensions(path, extensions) {
                files.push(path.clone());
            }
        } else if path.is_dir() {
            if recursive {
                for entry in WalkDir::new(path) {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(e) => {
                            log::warn!("Skipping unreadable entry: {e}");
                            continue;
                        }
                    };
                    if entry.file_type().is_file() && matches_extensions(entry.path(), extensions)
                    {
                        files.push(entry.into_path());
                    }
                }
            } else {
                log::warn!(
                    "{} is a directory. Use --recursive to process directories.",
                    path.display()
                );
            }
        } else {
            log::warn!("{} is not a file or directory", path.display());
        }
    }

    if files.is_empty() {
        return Err(TimefixError::NoFiles);
    }

    files.sort();
    Ok(files)
}

fn matches_extensions(path: &Path, extensions: Option<&[String]>) -> bool {
    let Some(extensions) = extensions else {
        return true;
    };

    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };

    extensions
        .iter()
        .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Resolve one file and report it, committing the timestamp when asked.
/// Failures are reported and swallowed so the batch keeps going.
pub fn process_file(resolver: &mut TimestampResolver, path: &Path, options: ProcessOptions) {
    let resolved = match resolver.resolve(path) {
        Ok(resolved) => resolved,
        Err(e) => {
            log::error!("Skipping {}: {}", path.display(), e);
            return;
        }
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let formatted = format_timestamp(resolved.timestamp);

    println!("{name}");
    println!("  Timestamp: {formatted}");
    println!("  Source: {}", resolved.source);

    if options.set_timestamp {
        if options.dry_run {
            println!("  [DRY RUN] Would set file timestamp to {formatted}");
        } else {
            match set_file_timestamp(path, resolved.timestamp) {
                Ok(()) => println!("  [OK] Set file timestamp to {formatted}"),
                Err(e) => {
                    log::error!("{e}");
                    println!("  [ERROR] Failed to set file timestamp");
                }
            }
        }
    }
    println!();
}

fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(REPORT_DATE_FORMAT)
        .unwrap_or_else(|_| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_matches_extensions_no_filter() {
        assert!(matches_extensions(Path::new("a.txt"), None));
        assert!(matches_extensions(Path::new("no_extension"), None));
    }

    #[test]
    fn test_matches_extensions_filter() {
        let exts = vec!["jpg".to_string(), ".PNG".to_string()];

        assert!(matches_extensions(Path::new("a.jpg"), Some(&exts)));
        assert!(matches_extensions(Path::new("a.JPG"), Some(&exts)));
        assert!(matches_extensions(Path::new("a.png"), Some(&exts)));
        assert!(!matches_extensions(Path::new("a.txt"), Some(&exts)));
        assert!(!matches_extensions(Path::new("no_extension"), Some(&exts)));
    }

    #[test]
    fn test_collect_single_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("a.txt");
        file.write_str("x").unwrap();

        let files = collect_files(&[file.path().to_path_buf()], false, None).unwrap();
        assert_eq!(files, vec![file.path().to_path_buf()]);
    }

    #[test]
    fn test_collect_directory_requires_recursive() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("x").unwrap();

        let result = collect_files(&[temp.path().to_path_buf()], false, None);
        assert!(matches!(result, Err(TimefixError::NoFiles)));
    }

    #[test]
    fn test_collect_recursive_is_sorted() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("b.txt").write_str("x").unwrap();
        temp.child("sub/a.txt").write_str("x").unwrap();

        let files = collect_files(&[temp.path().to_path_buf()], true, None).unwrap();
        assert_eq!(files.len(), 2);
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_collect_recursive_with_extension_filter() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.jpg").write_str("x").unwrap();
        temp.child("b.log").write_str("x").unwrap();
        temp.child("sub/c.jpg").write_str("x").unwrap();

        let exts = vec!["jpg".to_string()];
        let files = collect_files(&[temp.path().to_path_buf()], true, Some(&exts)).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "jpg"));
    }

    #[test]
    #[cfg(unix)]
    fn test_collect_skips_unreadable_subdirectory() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("x").unwrap();
        temp.child("locked/hidden.txt").write_str("x").unwrap();

        let locked = temp.child("locked");
        fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o000)).unwrap();

        // An unreadable subdirectory is skipped with a warning, it must
        // not abort collection of the rest of the worklist.
        let result = collect_files(&[temp.path().to_path_buf()], true, None);

        fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o755)).unwrap();

        let files = result.unwrap();
        assert!(files.iter().any(|f| f.ends_with("a.txt")));
    }

    #[test]
    fn test_collect_nothing_is_an_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let missing = temp.child("nope.txt");

        let result = collect_files(&[missing.path().to_path_buf()], false, None);
        assert!(matches!(result, Err(TimefixError::NoFiles)));
    }
}
