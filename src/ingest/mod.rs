pub mod records;
pub mod walker;

pub use records::{decode_file, Record, RecordFormat};
pub use walker::discover_files;

use crate::error::Result;
use std::path::PathBuf;

/// Load records from a mix of files and directories
///
/// Files are decoded by extension and rejected if the format is unsupported.
/// Directories are walked recursively and only supported files are taken.
pub fn load_records(paths: &[PathBuf]) -> Result<Vec<Record>> {
    let mut all_records = Vec::new();

    for path in paths {
        if path.is_dir() {
            for file in discover_files(path)? {
                all_records.extend(decode_file(&file)?);
            }
        } else {
            all_records.extend(decode_file(path)?);
        }
    }

    log::info!("Loaded {} records from {} input path(s)", all_records.len(), paths.len());
    Ok(all_records)
}
