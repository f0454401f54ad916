use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// Regular files directly inside `dir` whose extension is `xml`
/// (ASCII case-insensitive). Subdirectories are not descended into.
///
/// The result is sorted so logs are reproducible; callers must not rely on
/// the order for correctness.
pub fn list_xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut xml_files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_xml(entry.path()) {
            xml_files.push(entry.into_path());
        }
    }
    xml_files.sort();
    Ok(xml_files)
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}
