use walkdir::WalkDir;
use std::path::{Path, PathBuf};
use crate::error::{Result, TwingraphError};

use super::RecordFormat;

/// Discover all decodable record files under `root`.
///
/// Recursively walks the directory tree and keeps files whose extension maps
/// to a [`RecordFormat`]. Everything else is skipped, so a directory may hold
/// notes, images or PDFs alongside the data. Results are sorted by path.
pub fn discover_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|e| TwingraphError::Io(e.into()))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if RecordFormat::from_path(path).is_none() {
            log::debug!("Skipping {}: not a record file", path.display());
            continue;
        }

        files.push(path.to_path_buf());
    }

    log::info!("Discovered {} record files in {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use std::fs;

    #[test]
    fn test_discover_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("fleet/2024")).unwrap();
        fs::write(root.join("cars.csv"), "brand\nAudi\n").unwrap();
        fs::write(root.join("brands.json"), "{}").unwrap();
        fs::write(root.join("fleet/batteries.yaml"), "kwh: 82").unwrap();
        fs::write(root.join("fleet/2024/charging.YML"), "kw: 11").unwrap();
        fs::write(root.join("README.md"), "# Data").unwrap();
        fs::write(root.join("specs.pdf"), b"%PDF-1.4").unwrap();

        let files = discover_files(root).unwrap();

        // csv, json, yaml, YML = 4; md and pdf skipped
        assert_eq!(files.len(), 4);
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"cars.csv".to_string()));
        assert!(names.contains(&"brands.json".to_string()));
        assert!(names.contains(&"batteries.yaml".to_string()));
        assert!(names.contains(&"charging.YML".to_string()));
        assert!(!names.contains(&"specs.pdf".to_string()));
    }

    #[test]
    fn test_discover_files_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = discover_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 0);
    }
}
