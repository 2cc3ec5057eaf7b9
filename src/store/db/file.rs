use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::trace;

use crate::{
    Result,
    store::{KvStore, map_db_err},
};

/// Stores every key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    /// Opens `dir`, creating it when missing.
    pub fn open<T: AsRef<Path>>(dir: T) -> Result<Self> {
        fs::create_dir_all(dir.as_ref()).map_err(map_db_err)?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    fn path(
        &self,
        key: &str,
    ) -> PathBuf {
        // keys come from workflow names, keep them to one path segment
        let file: String = key.chars().map(|c| if c == '/' || c == '\\' || c == ':' { '_' } else { c }).collect();
        self.dir.join(format!("{}.json", file))
    }
}

impl KvStore for FileKv {
    fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_db_err(e)),
        }
    }

    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<()> {
        trace!("file_kv::set({})", key);
        fs::write(self.path(key), value).map_err(map_db_err)
    }

    fn remove(
        &self,
        key: &str,
    ) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_db_err(e)),
        }
    }
}
