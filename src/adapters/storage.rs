use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.resolve(path))?;
        Ok(data)
    }

    /// 先寫入同目錄的暫存檔再原子替換，失敗時不會留下截斷的檔案
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        let parent = match full_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;

        if let Ok(metadata) = fs::metadata(&full_path) {
            fs::set_permissions(tmp.path(), metadata.permissions())?;
        }

        tmp.persist(&full_path).map_err(|e| e.error)?;
        Ok(())
    }

    async fn file_size(&self, path: &str) -> Result<u64> {
        Ok(fs::metadata(self.resolve(path))?.len())
    }
}
