use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

/// Create a plain text file (nothing EXIF-capable) under the temp dir.
pub fn text_file(temp_dir: &TempDir, name: &str) -> ChildPath {
    let file = temp_dir.child(name);
    file.write_str("hello").unwrap();
    file
}
