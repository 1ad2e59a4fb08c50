use std::path::Path;

use regex::{Captures, Regex};
use spdlog::debug;

use crate::config::{Config, SlugSource};
use crate::document::Document;
use crate::util::{extract_slug, is_folder_post, parent_dir_name};

/// Rewrites `![alt](pic/name)` in folder posts to `![alt](/posts/<slug>/name)` before rendering.
pub struct PathUpdater {
    content_file: String,
    output_dir: String,
    slug_source: SlugSource,
    image_regex: Regex,
}

impl PathUpdater {
    pub fn new(content_file: &str, asset_dir: &str, output_dir: &str, slug_source: SlugSource) -> PathUpdater {
        let pattern = format!(r"!\[([^\]]*)\]\({}/([^)]+)\)", regex::escape(asset_dir));
        PathUpdater {
            content_file: content_file.to_string(),
            output_dir: output_dir.to_string(),
            slug_source,
            // Escaped input, the pattern is always valid
            image_regex: Regex::new(&pattern).unwrap(),
        }
    }

    pub fn from_config(config: &Config) -> PathUpdater {
        let defaults = &config.defaults;
        Self::new(&defaults.content_file, &defaults.asset_dir, &defaults.output_dir, defaults.slug_source)
    }

    /// Documents not loaded from a content file are left alone.
    pub fn update_image_paths(&self, post: &mut Document) {
        if !is_folder_post(&post.path, &self.content_file) {
            return;
        }

        let Some(slug) = self.post_slug(post) else {
            return;
        };

        let updated = self.update_content_image_paths(&post.content, &slug);
        if updated != post.content {
            debug!("Updated image paths of {}", post.path.display());
            post.content = updated;
        }
    }

    fn post_slug(&self, post: &Document) -> Option<String> {
        match self.slug_source {
            SlugSource::Folder => folder_slug(&post.path),
            SlugSource::Document => post.slug().or_else(|| folder_slug(&post.path)),
        }
    }

    pub fn update_content_image_paths(&self, content: &str, slug: &str) -> String {
        self.image_regex.replace_all(content, |caps: &Captures| {
            format!("![{}](/{}/{}/{})", &caps[1], self.output_dir, slug, &caps[2])
        }).into_owned()
    }
}

fn folder_slug(post_path: &Path) -> Option<String> {
    parent_dir_name(post_path).map(|name| extract_slug(&name))
}
