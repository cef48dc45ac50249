use crate::error::ImportError;
use std::path::{Path, PathBuf};


/// Regular files in `dir` whose name starts with `prefix`, sorted by name.
///
/// Names that are not valid UTF-8 are skipped.
pub fn list_input_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, ImportError> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(|error| enumeration_failed(dir, error))? {
        let entry = entry.map_err(|error| enumeration_failed(dir, error))?;
        let is_candidate = entry
            .file_name()
            .to_str()
            .map_or(false, |name| name.starts_with(prefix));
        if !is_candidate {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}


fn enumeration_failed(dir: &Path, error: std::io::Error) -> ImportError {
    ImportError::InputEnumerationFailed {
        dir: dir.to_path_buf(),
        error,
    }
}
