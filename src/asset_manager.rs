use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spdlog::{error, info};

use crate::collection::PostCollection;
use crate::config::{AssetErrors, Config, SlugSource};
use crate::folder_list::FolderList;
use crate::util::extract_slug;
use crate::util::fs::copy_binary;

pub struct PostInfo {
    pub dir: PathBuf,
    pub name: String,
    pub slug: String,
}

/// Copies `<posts>/*/pic/*` to `<destination>/posts/<slug>/` once the site is written.
pub struct AssetManager {
    pub posts_root: PathBuf,
    pub destination: PathBuf,
    pub content_file: String,
    pub asset_dir: String,
    pub placeholder_extension: String,
    pub output_dir: String,
    pub slug_source: SlugSource,
    pub asset_errors: AssetErrors,
}

impl AssetManager {
    pub fn from_config(config: &Config) -> AssetManager {
        let defaults = &config.defaults;
        AssetManager {
            posts_root: config.posts_root(),
            destination: config.paths.destination.clone(),
            content_file: defaults.content_file.clone(),
            asset_dir: defaults.asset_dir.clone(),
            placeholder_extension: defaults.placeholder_extension.clone(),
            output_dir: defaults.output_dir.clone(),
            slug_source: defaults.slug_source,
            asset_errors: defaults.asset_errors,
        }
    }

    /// Returns the number of copied files. With `AssetErrors::Abort` the first failure ends the pass.
    pub fn copy_post_assets(&self, posts: &dyn PostCollection) -> Result<usize> {
        let folder_list = FolderList {
            root_dir: self.posts_root.clone(),
            content_file: self.content_file.clone(),
            asset_dir: self.asset_dir.clone(),
        };
        let asset_files = folder_list.retrieve_asset_files()
            .with_context(|| format!("Unable to list post assets in {}", self.posts_root.display()))?;

        let mut copied = 0;
        for asset_file in asset_files {
            match self.copy_single_asset(posts, &asset_file) {
                Ok(true) => copied += 1,
                Ok(false) => {}
                Err(e) if self.asset_errors == AssetErrors::Skip => {
                    error!("{:#}", e);
                }
                Err(e) => return Err(e),
            }
        }

        info!("Copied {} post assets to {}", copied, self.destination.join(&self.output_dir).display());
        Ok(copied)
    }

    fn copy_single_asset(&self, posts: &dyn PostCollection, asset_file: &Path) -> Result<bool> {
        if !asset_file.is_file() {
            return Ok(false);
        }
        let (Some(post_info), Some(file_name)) = (self.extract_post_info(posts, asset_file), asset_file.file_name()) else {
            return Ok(false);
        };

        let asset_name = self.process_asset_name(&file_name.to_string_lossy());
        let target_path = self.target_path(&post_info.slug, &asset_name);

        copy_binary(asset_file, &target_path)
            .with_context(|| format!("Failed to copy {} to {}", asset_file.display(), target_path.display()))?;

        info!("Copying post asset: {} for {}", asset_name, post_info.name);
        Ok(true)
    }

    /// The post folder is two levels above the asset: `<post>/pic/<asset>`.
    fn extract_post_info(&self, posts: &dyn PostCollection, asset_file: &Path) -> Option<PostInfo> {
        let dir = asset_file.parent()?.parent()?;
        let name = dir.file_name()?.to_string_lossy().to_string();

        let document_slug = match self.slug_source {
            SlugSource::Folder => None,
            SlugSource::Document => posts.find_by_folder(dir).and_then(|doc| doc.slug()),
        };
        let slug = document_slug.unwrap_or_else(|| extract_slug(&name));

        Some(PostInfo {
            dir: dir.to_path_buf(),
            name,
            slug,
        })
    }

    /// `photo.jpg.txt` stands in for `photo.jpg`.
    pub fn process_asset_name(&self, asset_name: &str) -> String {
        match asset_name.strip_suffix(self.placeholder_extension.as_str()) {
            Some(stripped) if !stripped.is_empty() && !self.placeholder_extension.is_empty() => stripped.to_string(),
            _ => asset_name.to_string(),
        }
    }

    pub fn target_path(&self, slug: &str, asset_name: &str) -> PathBuf {
        self.destination.join(&self.output_dir).join(slug).join(asset_name)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::document::Document;
    use crate::meta::MetaValue;
    use crate::test_data::{install_test_logger, log_lines, write_asset, write_post, CONTENT_MD, PNG_BYTES};

    use super::*;

    fn manager(site: &Path) -> AssetManager {
        AssetManager::from_config(&Config::new(site, &site.join("_site")))
    }

    #[test]
    fn test_process_asset_name() {
        let manager = manager(Path::new("site"));
        assert_eq!(manager.process_asset_name("photo.jpg.txt"), "photo.jpg");
        assert_eq!(manager.process_asset_name("photo.jpg"), "photo.jpg");
        assert_eq!(manager.process_asset_name("notes.txt.bak"), "notes.txt.bak");
        assert_eq!(manager.process_asset_name(".txt"), ".txt");
    }

    #[test]
    fn test_copy_post_assets() -> Result<()> {
        let site = tempfile::tempdir()?;
        let posts_root = site.path().join("_posts");
        write_post(&posts_root, "2024-03-01-trip", CONTENT_MD);
        write_asset(&posts_root, "2024-03-01-trip", "photo.jpg.txt", &PNG_BYTES);
        write_asset(&posts_root, "2024-03-01-trip", "cat.png", &PNG_BYTES[..4]);
        write_asset(&posts_root, "2024-03-02-hello-world", "map.gif", b"GIF89a");
        fs::create_dir_all(posts_root.join("2024-03-01-trip/pic/raw"))?;

        let posts: Vec<Document> = vec![];
        let copied = manager(site.path()).copy_post_assets(&posts)?;

        assert_eq!(copied, 3);
        let out = site.path().join("_site").join("posts");
        assert_eq!(fs::read(out.join("trip/photo.jpg"))?, PNG_BYTES);
        assert_eq!(fs::read(out.join("trip/cat.png"))?, &PNG_BYTES[..4]);
        assert_eq!(fs::read(out.join("hello world/map.gif"))?, b"GIF89a");
        assert!(!out.join("trip/raw").exists());
        assert!(!out.join("trip/photo.jpg.txt").exists());
        Ok(())
    }

    #[test]
    fn test_no_posts_dir() -> Result<()> {
        let site = tempfile::tempdir()?;
        let posts: Vec<Document> = vec![];
        assert_eq!(manager(site.path()).copy_post_assets(&posts)?, 0);
        Ok(())
    }

    #[test]
    fn test_document_slug() -> Result<()> {
        let site = tempfile::tempdir()?;
        let posts_root = site.path().join("_posts");
        let content_file = write_post(&posts_root, "2024-03-01-trip", CONTENT_MD);
        write_asset(&posts_root, "2024-03-01-trip", "a.png", b"a");
        write_asset(&posts_root, "2024-03-02-orphan", "b.png", b"b");

        let mut doc = Document::new(&content_file, "posts");
        doc.data.insert("slug".to_string(), MetaValue::from("road-trip"));
        let posts = vec![doc];

        let mut manager = manager(site.path());
        manager.slug_source = SlugSource::Document;
        assert_eq!(manager.copy_post_assets(&posts)?, 2);

        let out = site.path().join("_site").join("posts");
        assert_eq!(fs::read(out.join("road-trip/a.png"))?, b"a");
        assert_eq!(fs::read(out.join("orphan/b.png"))?, b"b");
        Ok(())
    }

    #[test]
    fn test_copy_failure_policy() -> Result<()> {
        let site = tempfile::tempdir()?;
        let posts_root = site.path().join("_posts");
        write_asset(&posts_root, "2024-03-01-a", "one.png", b"1");
        write_asset(&posts_root, "2024-03-02-b", "two.png", b"2");

        // A file where the post output directory of the first post should go
        let out = site.path().join("_site").join("posts");
        fs::create_dir_all(&out)?;
        fs::write(out.join("a"), "not a directory")?;

        let posts: Vec<Document> = vec![];
        let mut manager = manager(site.path());
        assert!(manager.copy_post_assets(&posts).is_err());
        assert!(!out.join("b/two.png").exists());

        manager.asset_errors = AssetErrors::Skip;
        assert_eq!(manager.copy_post_assets(&posts)?, 1);
        assert_eq!(fs::read(out.join("b/two.png"))?, b"2");
        Ok(())
    }

    #[test]
    fn test_copy_logs() -> Result<()> {
        install_test_logger();
        let site = tempfile::tempdir()?;
        let posts_root = site.path().join("_posts");
        write_asset(&posts_root, "2024-05-06-log-assets", "logged.jpg.txt", &PNG_BYTES);
        write_asset(&posts_root, "2024-05-07-log-broken", "broken.png", b"x");

        let out = site.path().join("_site").join("posts");
        fs::create_dir_all(&out)?;
        fs::write(out.join("log broken"), "not a directory")?;

        let posts: Vec<Document> = vec![];
        let mut manager = manager(site.path());
        manager.asset_errors = AssetErrors::Skip;
        assert_eq!(manager.copy_post_assets(&posts)?, 1);

        let copied = log_lines("2024-05-06-log-assets");
        assert_eq!(copied.len(), 1);
        assert!(copied[0].contains("[info] Copying post asset: logged.jpg for 2024-05-06-log-assets"));

        let failed = log_lines("broken.png");
        assert_eq!(failed.len(), 1);
        assert!(failed[0].contains("[error] Failed to copy"));
        assert!(log_lines("Copying post asset: broken.png").is_empty());
        Ok(())
    }
}
