use std::path::{Path, PathBuf};

use crate::document::{Document, POSTS_COLLECTION};

/// The part of the host's posts collection the plugin works with.
pub trait PostCollection {
    fn documents(&self) -> &[Document];

    fn append(&mut self, document: Document);

    /// A fresh document bound to this collection. Hosts seeding default metadata override this.
    fn new_document(&self, path: &Path) -> Document {
        Document::new(path, POSTS_COLLECTION)
    }

    fn document_paths(&self) -> Vec<PathBuf> {
        self.documents().iter().map(|doc| doc.path.clone()).collect()
    }

    /// Document whose source lives directly in `folder`.
    fn find_by_folder(&self, folder: &Path) -> Option<&Document> {
        self.documents().iter().find(|doc| doc.dir() == Some(folder))
    }
}

impl PostCollection for Vec<Document> {
    fn documents(&self) -> &[Document] {
        self.as_slice()
    }

    fn append(&mut self, document: Document) {
        self.push(document);
    }
}
