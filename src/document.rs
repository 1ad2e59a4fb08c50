use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::meta::{MetaValue, Metadata};
use crate::util::normalize_array;

pub const POSTS_COLLECTION: &str = "posts";

/// A post as registered in the site's posts collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: PathBuf,
    pub collection: String,
    pub data: Metadata,
    pub content: String,
}

impl Document {
    pub fn new(path: &Path, collection: &str) -> Document {
        Document {
            path: path.to_path_buf(),
            collection: collection.to_string(),
            data: Metadata::new(),
            content: String::new(),
        }
    }

    /// Folder holding the document source.
    pub fn dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Non-empty value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&MetaValue> {
        self.data.get(key).filter(|v| !v.is_empty())
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.value(key).and_then(|v| v.scalar_text())
    }

    pub fn title(&self) -> Option<String> {
        self.text("title")
    }

    pub fn slug(&self) -> Option<String> {
        self.text("slug")
    }

    pub fn layout(&self) -> Option<String> {
        self.text("layout")
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        self.value("date").and_then(|v| v.as_timestamp())
    }

    pub fn tags(&self) -> Vec<String> {
        normalize_array(self.data.get("tags"))
    }

    pub fn categories(&self) -> Vec<String> {
        normalize_array(self.data.get("categories"))
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "path={}, title={}, date={}, slug={}, layout={}, tags=[{}], categories=[{}]",
               self.path.display(),
               self.title().unwrap_or_default(),
               self.value("date").map(|d| d.to_string()).unwrap_or_default(),
               self.slug().unwrap_or_default(),
               self.layout().unwrap_or_default(),
               self.tags().join(", "),
               self.categories().join(", "),
        )
    }
}
