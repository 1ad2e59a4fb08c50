use anyhow::Result;

use crate::asset_manager::AssetManager;
use crate::collection::PostCollection;
use crate::config::Config;
use crate::document::Document;
use crate::path_updater::PathUpdater;
use crate::post_processor::PostProcessor;

/// Entry points the host calls during a build:
/// `post_read` once after content is read, `pre_render` per post, `post_write` once after output is written.
pub struct FolderPosts {
    pub post_processor: PostProcessor,
    pub path_updater: PathUpdater,
    pub asset_manager: AssetManager,
}

impl FolderPosts {
    pub fn new(config: &Config) -> FolderPosts {
        FolderPosts {
            post_processor: PostProcessor::from_config(config),
            path_updater: PathUpdater::from_config(config),
            asset_manager: AssetManager::from_config(config),
        }
    }

    pub fn post_read(&self, posts: &mut dyn PostCollection) -> usize {
        self.post_processor.process_folder_posts(posts)
    }

    pub fn pre_render(&self, post: &mut Document) {
        self.path_updater.update_image_paths(post)
    }

    pub fn post_write(&self, posts: &dyn PostCollection) -> Result<usize> {
        self.asset_manager.copy_post_assets(posts)
    }
}
