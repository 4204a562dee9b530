use std::fs;
use std::path::PathBuf;

use log::warn;

use super::KeyValueStore;

/// File-backed store, one file per key under a data directory. Read failures
/// degrade to absent data; write failures are logged and swallowed so no
/// storage hiccup is fatal to a play session.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: PathBuf) -> Self {
        if !data_dir.exists() {
            let _ = fs::create_dir_all(&data_dir);
        }
        Self { data_dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(error) = fs::write(self.path_for(key), value) {
            warn!(target: "storage", "Failed to persist {:?}: {}", key, error);
        }
    }

    fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path_for(key));
    }
}
