use std::fs;
use std::path::{Path, PathBuf};

use xmldb_core::Error;

pub const USAGE: &str = "Usage: xmldb <data directory> <index directory>";

/// Validated command line: both directories exist and are usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub data_dir: PathBuf,
    pub index_dir: PathBuf,
}

impl Invocation {
    /// Expects exactly `<data-dir> <index-dir>` (program name excluded).
    pub fn from_args(args: &[String]) -> Result<Self, Error> {
        let [data_dir, index_dir] = args else {
            return Err(Error::BadInvocation(USAGE.to_string()));
        };
        let data_dir = PathBuf::from(data_dir);
        let index_dir = PathBuf::from(index_dir);

        if !is_readable_dir(&data_dir) {
            return Err(Error::BadInvocation(format!(
                "Document directory '{}' does not exist or is not readable, please check the path",
                display_path(&data_dir)
            )));
        }
        if !is_readable_dir(&index_dir) || !is_writable(&index_dir) {
            return Err(Error::BadInvocation(format!(
                "Index directory '{}' does not exist or is not writeable/readable, please check the path",
                display_path(&index_dir)
            )));
        }
        Ok(Self { data_dir, index_dir })
    }
}

fn is_readable_dir(path: &Path) -> bool {
    path.is_dir() && fs::read_dir(path).is_ok()
}

/// True when the current user can create a file in `path`.
fn is_writable(path: &Path) -> bool {
    tempfile::tempfile_in(path).is_ok()
}

fn display_path(path: &Path) -> String {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()).display().to_string()
}
