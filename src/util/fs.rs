use std::fs::{create_dir_all, File};
use std::io;
use std::path::Path;

/// Copies `source` to `target` byte for byte, creating the parent directories of `target`.
/// Both handles are closed on every return path.
pub fn copy_binary(source: &Path, target: &Path) -> io::Result<u64> {
    if let Some(parent) = target.parent() {
        create_dir_all(parent)?;
    }

    let mut input = File::open(source)?;
    let mut output = File::create(target)?;
    io::copy(&mut input, &mut output)
}
