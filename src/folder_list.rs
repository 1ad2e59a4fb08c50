use std::{fs, io};
use std::path::{Path, PathBuf};

/// Post folders directly below `root_dir`.
pub struct FolderList {
    pub root_dir: PathBuf,
    pub content_file: String,
    pub asset_dir: String,
}

impl FolderList {
    /// Every `<root>/*/<content_file>`, sorted by path. A missing root gives an empty list.
    pub fn retrieve_content_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files = vec![];
        for dir in Self::list_dirs(&self.root_dir)? {
            let content_path = dir.join(&self.content_file);
            if content_path.is_file() {
                files.push(content_path);
            }
        }
        Ok(files)
    }

    /// Every regular file in `<root>/*/<asset_dir>/`, sorted by path. Sub directories are ignored.
    pub fn retrieve_asset_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut assets = vec![];
        for dir in Self::list_dirs(&self.root_dir)? {
            let asset_dir = dir.join(&self.asset_dir);
            if !asset_dir.is_dir() {
                continue;
            }
            let entries = fs::read_dir(&asset_dir)?;
            for entry in entries {
                let entry = entry?;
                if entry.path().is_file() {
                    assets.push(entry.path());
                }
            }
        }
        assets.sort();
        Ok(assets)
    }

    fn list_dirs(root_dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut dirs: Vec<PathBuf> = vec![];
        let entries = match fs::read_dir(root_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(dirs),
            Err(e) => return Err(e),
        };
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}
