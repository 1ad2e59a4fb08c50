use std::io;
use std::path::{Path, PathBuf};

use spdlog::{debug, error, info, warn};

use crate::collection::PostCollection;
use crate::config::Config;
use crate::document::Document;
use crate::folder_list::FolderList;
use crate::meta::{MetaValue, Metadata};
use crate::util::date::{coerce_to_timestamp, extract_date_from_path, midnight, modified_time};
use crate::util::front_matter::{parse_front_matter, split_content};
use crate::util::{extract_slug, normalize_array, parent_dir_name, post_exists_for_folder};

/// Turns `<posts>/*/content.md` folders into documents of the posts collection.
pub struct PostProcessor {
    pub posts_root: PathBuf,
    pub content_file: String,
    pub asset_dir: String,
    pub default_layout: String,
}

impl PostProcessor {
    pub fn from_config(config: &Config) -> PostProcessor {
        PostProcessor {
            posts_root: config.posts_root(),
            content_file: config.defaults.content_file.clone(),
            asset_dir: config.defaults.asset_dir.clone(),
            default_layout: config.defaults.layout.clone(),
        }
    }

    /// Returns how many documents were added. Folders that fail are logged and left out.
    pub fn process_folder_posts(&self, posts: &mut dyn PostCollection) -> usize {
        let folder_list = FolderList {
            root_dir: self.posts_root.clone(),
            content_file: self.content_file.clone(),
            asset_dir: self.asset_dir.clone(),
        };

        let content_files = match folder_list.retrieve_content_files() {
            Ok(files) => files,
            Err(e) => {
                error!("Unable to list post folders in {}: {}", self.posts_root.display(), e);
                return 0;
            }
        };

        let created = content_files.iter()
            .filter(|content_file| self.process_single_post(posts, content_file))
            .count();
        info!("Created {} folder posts from {}", created, self.posts_root.display());
        created
    }

    fn process_single_post(&self, posts: &mut dyn PostCollection, content_file: &Path) -> bool {
        let (Some(post_dir), Some(post_name)) = (content_file.parent(), parent_dir_name(content_file)) else {
            return false;
        };

        if post_exists_for_folder(&posts.document_paths(), post_dir) {
            debug!("Post already registered for {}", post_dir.display());
            return false;
        }

        let content = match std::fs::read_to_string(content_file) {
            Ok(content) => content,
            Err(e) => {
                error!("Unable to read {}: {}", content_file.display(), e);
                return false;
            }
        };

        let (front_matter, body) = split_content(&content);
        let Some(front_matter) = front_matter else {
            warn!("No valid front matter found in {}", content_file.display());
            return false;
        };

        let Some(data) = parse_front_matter(front_matter, content_file) else {
            return false;
        };

        let post = match self.create_post_document(posts, content_file, data, body, &post_name) {
            Ok(post) => post,
            Err(e) => {
                error!("Unable to create post from {}: {}", content_file.display(), e);
                return false;
            }
        };

        posts.append(post);
        info!("Processing folder post: {}", post_name);
        true
    }

    fn create_post_document(&self, posts: &dyn PostCollection, content_file: &Path, data: Metadata,
                            body: &str, post_name: &str) -> io::Result<Document> {
        let mut post = posts.new_document(content_file);
        post.data.extend(data.clone());
        post.content = body.to_string();

        self.set_post_metadata(&mut post, &data, post_name, content_file)?;
        Ok(post)
    }

    /// Fills title, date, layout, slug, tags and categories, in that order.
    /// A non-empty value already on the document always wins.
    fn set_post_metadata(&self, post: &mut Document, data: &Metadata, post_name: &str,
                         content_file: &Path) -> io::Result<()> {
        let slug = extract_slug(post_name);

        let title = first_non_empty([post.data.get("title"), data.get("title")])
            .cloned()
            .unwrap_or_else(|| MetaValue::from(slug.as_str()));
        post.data.insert("title".to_string(), title);

        let date = resolve_date(data, post_name, content_file)?;
        post.data.insert("date".to_string(), date);

        if post.value("layout").is_none() {
            post.data.insert("layout".to_string(), MetaValue::from(self.default_layout.as_str()));
        }
        if post.value("slug").is_none() {
            post.data.insert("slug".to_string(), MetaValue::from(slug));
        }

        let tags = normalize_array(post.data.get("tags"));
        post.data.insert("tags".to_string(), MetaValue::from(tags));
        let categories = normalize_array(post.data.get("categories"));
        post.data.insert("categories".to_string(), MetaValue::from(categories));

        Ok(())
    }
}

fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a MetaValue>; N]) -> Option<&'a MetaValue> {
    candidates.into_iter()
        .flatten()
        .find(|value| !value.is_empty())
}

/// Front matter date, then the date in the folder name, then the mtime of the content file.
fn resolve_date(data: &Metadata, post_name: &str, content_file: &Path) -> io::Result<MetaValue> {
    if let Some(date) = first_non_empty([data.get("date")]) {
        return Ok(coerce_to_timestamp(date.clone()));
    }

    if let Some(date) = extract_date_from_path(post_name) {
        return Ok(MetaValue::Timestamp(midnight(date)));
    }

    Ok(MetaValue::Timestamp(modified_time(content_file)?))
}
