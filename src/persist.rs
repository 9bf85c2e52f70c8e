//! Atomic file replacement shared by the dataset writer and the weather cache.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
};

use camino::{Utf8Path, Utf8PathBuf};

use crate::launchwx_errors::LaunchWxError;

/// Sibling temporary path used while `path` is being written.
fn staging_path(path: &Utf8Path) -> Utf8PathBuf {
    let file_name = path.file_name().unwrap_or("output");
    path.with_file_name(format!(".{file_name}.partial"))
}

/// Write `path` in one step: the content goes to a sibling staging file that is renamed
/// over `path` only once `write` succeeded. Missing parent directories are created.
///
/// On failure the staging file is removed and `path` is left untouched.
pub(crate) fn write_atomically<F>(path: &Utf8Path, write: F) -> Result<(), LaunchWxError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), LaunchWxError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    let result = File::create(&staging)
        .map_err(LaunchWxError::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush()?;
            Ok(())
        })
        .and_then(|_| fs::rename(&staging, path).map_err(LaunchWxError::from));

    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}
