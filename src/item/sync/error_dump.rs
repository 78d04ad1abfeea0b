use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use serde::Serialize;
use uuid::Uuid;

use crate::error::BatchError;

/// Default folder for rejected batches, relative to the working directory.
pub const DEFAULT_ERRORS_FOLDER: &str = "errors";

/// Persists rejected batches for offline inspection.
///
/// Every batch goes to its own file, named with a fresh v4 UUID, holding the
/// batch as a JSON array followed by a newline. The folder is created on
/// first use.
#[derive(Debug, Clone)]
pub struct ErrorDump {
    folder: PathBuf,
}

impl Default for ErrorDump {
    fn default() -> Self {
        Self::new(DEFAULT_ERRORS_FOLDER)
    }
}

impl ErrorDump {
    /// Dumps batches into `folder`, which need not exist yet.
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// Writes `items` to a new file and returns its path.
    pub fn write<D: Serialize>(&self, items: &[D]) -> Result<PathBuf, BatchError> {
        fs::create_dir_all(&self.folder).map_err(|error| {
            BatchError::ItemWriter(format!(
                "cannot create {}: {}",
                self.folder.display(),
                error
            ))
        })?;

        let mut json = serde_json::to_string(items)
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;
        json.push('\n');

        let path = self.folder.join(Uuid::new_v4().to_string());
        File::options()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|mut file| file.write_all(json.as_bytes()))
            .map_err(|error| {
                BatchError::ItemWriter(format!("cannot write {}: {}", path.display(), error))
            })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::{Value, json};

    use super::ErrorDump;

    #[test]
    fn creates_folder_and_one_file_per_batch() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("nested").join("errors");
        let dump = ErrorDump::new(&folder);

        let first = dump.write(&[json!({"id": 1}), json!({"id": 2})]).unwrap();
        let second = dump.write(&[json!({"id": 3})]).unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read_dir(&folder).unwrap().count(), 2);

        let content = fs::read_to_string(&first).unwrap();
        assert!(content.ends_with('\n'));
        let batch: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(batch, json!([{"id": 1}, {"id": 2}]));
    }

    #[test]
    fn file_name_is_a_uuid() {
        let dir = tempfile::tempdir().unwrap();
        let dump = ErrorDump::new(dir.path());

        let path = dump.write(&[1, 2, 3]).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();

        assert!(uuid::Uuid::parse_str(name).is_ok());
        assert_eq!(path.parent(), Some(dir.path()));
    }
}
